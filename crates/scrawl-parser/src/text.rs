//! Text label extraction.
//!
//! Everything that is not text is blanked out of a copy of the grid. Words
//! one blank apart are grouped, and each group is scanned for runs of text.
//! A run is aligned by comparing its first and last columns with the other
//! runs of its group: a column shared by several run ends pulls the run to
//! the right, shared starts keep it left, and a lone run is centred.

use log::debug;

use scrawl_core::{
    cell::Cell,
    color::Color,
    diagram::{Label, TextAlign},
    geometry::{Bounds, CellMetrics},
    shape::Shape,
};

use crate::{cellset::CellSet, grid::TextGrid, markup};

/// Glyph written into single blanks between words so that they join one
/// group.
const GAP_FILL: char = '|';

/// A run of text starting at `cell`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub cell: Cell,
    pub text: String,
}

impl TextRun {
    /// The cell holding the last character.
    pub fn last_cell(&self) -> Cell {
        let len = self.text.chars().count() as i32;
        self.cell.offset((len - 1).max(0), 0)
    }
}

/// Blanks arrowheads, colour codes, boundaries and markup tags, leaving
/// only text.
pub fn remove_non_text(grid: &mut TextGrid) {
    for cell in grid.arrowhead_cells().iter() {
        grid.set(cell, ' ');
    }
    for code in markup::find_color_codes(grid) {
        blank_run(grid, code.cell(), code.len());
    }
    let boundaries = grid.boundary_cells();
    grid.fill_cells(&boundaries, ' ');
    for tag in markup::find_markup_tags(grid) {
        blank_run(grid, tag.cell(), tag.len());
    }
}

fn blank_run(grid: &mut TextGrid, start: Cell, len: usize) {
    for offset in 0..len {
        grid.set(start.offset(offset as i32, 0), ' ');
    }
}

/// Blank cells with text on both sides.
pub fn blanks_between_characters(grid: &TextGrid) -> CellSet {
    grid.cells()
        .filter(|&cell| {
            grid.is_blank(cell)
                && !grid.is_blank_or_outside(cell.east())
                && !grid.is_blank_or_outside(cell.west())
        })
        .collect()
}

/// Splits the text of `grid` into groups of words at most one blank apart.
pub fn text_groups(grid: &TextGrid) -> Vec<CellSet> {
    let mut joined = grid.clone();
    joined.fill_cells(&blanks_between_characters(grid), GAP_FILL);
    joined.non_blank_cells().connected_components()
}

/// Every run of text in the grid. A run ends at the first pair of blanks.
pub fn find_strings(grid: &TextGrid) -> Vec<TextRun> {
    let mut runs = Vec::new();
    for y in 0..grid.height() {
        let Some(row) = grid.row_string(y) else {
            continue;
        };
        let row: Vec<char> = row.chars().collect();
        let blank = |x: usize| row.get(x).is_none_or(|&c| c == ' ');

        let mut x = 0;
        while x < row.len() {
            if blank(x) {
                x += 1;
                continue;
            }
            let start = x;
            x += 1;
            while x < row.len() && !(blank(x) && blank(x + 1)) {
                x += 1;
            }
            let text: String = row[start..x].iter().collect();
            runs.push(TextRun {
                cell: Cell::new(start as i32, y as i32),
                text: text.trim_end().to_owned(),
            });
        }
    }
    runs
}

fn is_string_start(grid: &TextGrid, cell: Cell) -> bool {
    !grid.is_blank_or_outside(cell) && grid.is_blank_or_outside(cell.west())
}

fn is_string_end(grid: &TextGrid, cell: Cell) -> bool {
    !grid.is_blank_or_outside(cell) && grid.is_blank_or_outside(cell.east())
}

/// Counts the other cells of `cell`'s column matching `check`, or zero
/// when `cell` itself does not match.
fn others_in_column(grid: &TextGrid, cell: Cell, check: fn(&TextGrid, Cell) -> bool) -> usize {
    if !check(grid, cell) {
        return 0;
    }
    (0..grid.height() as i32)
        .map(|y| Cell::new(cell.x(), y))
        .filter(|&other| other != cell && check(grid, other))
        .count()
}

/// Horizontal alignment of `run` within its group.
pub fn alignment(group: &TextGrid, run: &TextRun) -> TextAlign {
    let starts = others_in_column(group, run.cell, is_string_start);
    let ends = others_in_column(group, run.last_cell(), is_string_end);
    match (starts, ends) {
        (0, 0) => TextAlign::Middle,
        (0, _) => TextAlign::End,
        (starts, ends) if starts > 0 && ends > starts => TextAlign::End,
        (starts, ends) if starts > 0 && ends == starts => TextAlign::Middle,
        _ => TextAlign::Start,
    }
}

/// Pixel bounds of the cells a run occupies.
pub fn run_bounds(run: &TextRun, metrics: CellMetrics) -> Bounds {
    Bounds::new(
        metrics.cell_min_x(run.cell),
        metrics.cell_min_y(run.cell),
        metrics.cell_max_x(run.last_cell()),
        metrics.cell_max_y(run.cell),
    )
}

/// Extracts the labels of `grid`, colouring text white where it sits on a
/// dark fill among `shapes`.
pub fn extract_labels(grid: &TextGrid, shapes: &[Shape], metrics: CellMetrics) -> Vec<Label> {
    let mut text = grid.clone();
    remove_non_text(&mut text);

    let groups = text_groups(&text);
    let mut labels = Vec::new();
    for group in &groups {
        let isolated = text.isolate(group);
        for run in find_strings(&isolated) {
            if run.text.is_empty() {
                continue;
            }
            let bounds = run_bounds(&run, metrics);
            let mut label = Label::new(run.text.clone(), bounds).with_align(alignment(&isolated, &run));
            let on_dark = markup::smallest_containing(shapes, bounds.center())
                .and_then(|index| shapes[index].fill_color())
                .is_some_and(|fill| fill.is_dark());
            if on_dark {
                label = label.with_color(Color::white());
            }
            labels.push(label);
        }
    }
    debug!(groups = groups.len(), labels = labels.len(); "Extracted text labels");
    labels
}

#[cfg(test)]
mod tests {
    use scrawl_core::{
        geometry::Point,
        shape::{PointKind, ShapePoint},
    };

    use super::*;

    fn text_of(source: &str) -> TextGrid {
        let mut grid = TextGrid::load(source, 8);
        remove_non_text(&mut grid);
        grid
    }

    fn run(x: i32, y: i32, text: &str) -> TextRun {
        TextRun {
            cell: Cell::new(x, y),
            text: text.to_owned(),
        }
    }

    #[test]
    fn test_remove_non_text_keeps_words() {
        let grid = text_of("+---+\n|Hi |\n+---+");
        let cells: CellSet = [Cell::new(3, 3), Cell::new(4, 3)].into_iter().collect();
        assert_eq!(grid.non_blank_cells(), cells);
    }

    #[test]
    fn test_remove_non_text_drops_codes_and_tags() {
        let grid = text_of("cRED {d} ok --> {zz}");
        assert_eq!(grid.row_string(2).unwrap().trim(), "ok     {zz}");
    }

    #[test]
    fn test_text_groups_join_single_blanks() {
        let grid = text_of("Hello world  again");
        let groups = text_groups(&grid);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 11);
        assert_eq!(groups[1].len(), 5);
    }

    #[test]
    fn test_find_strings() {
        let grid = TextGrid::from_rows(&["a b  cd ", "  x     "]);
        assert_eq!(
            find_strings(&grid),
            vec![run(0, 0, "a b"), run(5, 0, "cd"), run(2, 1, "x")]
        );
    }

    #[test]
    fn test_alignment() {
        let centred = TextGrid::from_rows(&["ab", "ab"]);
        assert_eq!(alignment(&centred, &run(0, 0, "ab")), TextAlign::Middle);

        let lone = TextGrid::from_rows(&["ab"]);
        assert_eq!(alignment(&lone, &run(0, 0, "ab")), TextAlign::Middle);

        let left = TextGrid::from_rows(&["abc", "ab "]);
        assert_eq!(alignment(&left, &run(0, 0, "abc")), TextAlign::Start);
        assert_eq!(alignment(&left, &run(0, 1, "ab")), TextAlign::Start);

        let right = TextGrid::from_rows(&["abc", " bc"]);
        assert_eq!(alignment(&right, &run(0, 0, "abc")), TextAlign::End);
    }

    #[test]
    fn test_run_bounds() {
        let bounds = run_bounds(&run(2, 2, "Hi"), CellMetrics::default());
        assert_eq!(bounds, Bounds::new(20.0, 28.0, 40.0, 42.0));
    }

    #[test]
    fn test_extract_labels() {
        let grid = TextGrid::load("+-----+\n| Hi  |\n+-----+", 8);
        let labels = extract_labels(&grid, &[], CellMetrics::default());

        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text(), "Hi");
        assert_eq!(labels[0].align(), TextAlign::Middle);
        assert_eq!(labels[0].bounds(), Bounds::new(40.0, 42.0, 60.0, 56.0));
        assert_eq!(labels[0].color(), Color::default());
    }

    #[test]
    fn test_text_on_dark_fill_is_white() {
        let grid = TextGrid::load("+-----+\n| Hi  |\n+-----+", 8);
        let mut shape = Shape::new_closed();
        for (x, y) in [(25.0, 35.0), (85.0, 35.0), (85.0, 63.0), (25.0, 63.0)] {
            shape.push_point(ShapePoint::new(Point::new(x, y), PointKind::Normal));
        }
        shape.set_fill_color(Color::from_rgb8(0x55, 0x55, 0xBB));

        let labels = extract_labels(&grid, &[shape], CellMetrics::default());
        assert_eq!(labels[0].color(), Color::white());
    }
}
