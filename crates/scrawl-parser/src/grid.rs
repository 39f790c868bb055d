//! The character grid a diagram is drawn on.
//!
//! [`TextGrid::load`] turns raw text into a rectangular grid surrounded by a
//! blank border two cells wide, so that every neighbourhood query near the
//! drawing reads blank glyphs instead of running off the edge. Loading also
//! normalises the text the way the rest of the pipeline expects:
//!
//! - tabs expand to the next tab stop;
//! - trailing blank lines are dropped and rows are padded to equal width;
//! - list bullets (`o` or `*` before a word) become `•`;
//! - human colour codes such as `cRED` become hex codes such as `cE32`.
//!
//! Out-of-range reads return `None`. Classification treats `None` as "not a
//! boundary", which is why the border exists at all.

use std::{fmt, ops::Range};

use scrawl_core::cell::Cell;

use crate::cellset::CellSet;

/// Width of the blank frame added around loaded text.
pub const BORDER: i32 = 2;

/// Tab stop distance used when none is configured.
pub const DEFAULT_TAB_SIZE: usize = 8;

pub(crate) const BULLET: char = '\u{2022}';

const HUMAN_COLOR_CODES: [(&str, &str); 6] = [
    ("GRE", "9D9"),
    ("BLU", "55B"),
    ("PNK", "FAA"),
    ("RED", "E32"),
    ("YEL", "FF3"),
    ("BLK", "000"),
];

/// A rectangular grid of glyphs.
///
/// # Examples
///
/// ```
/// use scrawl_core::cell::Cell;
/// use scrawl_parser::grid::TextGrid;
///
/// let grid = TextGrid::load("+-+\n| |\n+-+", 8);
/// assert_eq!(grid.width(), 7);
/// assert_eq!(grid.height(), 7);
/// assert_eq!(grid.get(Cell::new(2, 2)), Some('+'));
/// assert_eq!(grid.get(Cell::new(-1, 0)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGrid {
    width: usize,
    rows: Vec<Vec<char>>,
}

impl TextGrid {
    /// Creates a blank grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: vec![vec![' '; width]; height],
        }
    }

    /// Builds a grid from rows of text without any preprocessing.
    ///
    /// Rows are padded with blanks to the longest row.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let rows: Vec<Vec<char>> = rows.iter().map(|row| row.as_ref().chars().collect()).collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, ' ');
                row
            })
            .collect();
        Self { width, rows }
    }

    /// Loads diagram text, normalising it as described in the module docs.
    pub fn load(source: &str, tab_size: usize) -> Self {
        let mut lines: Vec<Vec<char>> = source
            .lines()
            .map(|line| expand_tabs(line, tab_size))
            .collect();
        while lines
            .last()
            .is_some_and(|line| line.iter().all(|c| c.is_whitespace()))
        {
            lines.pop();
        }

        let content_width = lines
            .iter()
            .filter(|line| !line.iter().all(|c| c.is_whitespace()))
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        let border = BORDER as usize;
        let width = content_width + 2 * border;

        let mut rows = vec![vec![' '; width]; border];
        for line in lines {
            let mut row = vec![' '; border];
            row.extend(
                line.into_iter()
                    .take(content_width)
                    .map(|c| if c.is_whitespace() { ' ' } else { c }),
            );
            row.resize(width, ' ');
            rows.push(row);
        }
        rows.extend(vec![vec![' '; width]; border]);

        let mut grid = Self { width, rows };
        grid.replace_bullets();
        grid.replace_human_color_codes();
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Whether `cell` lies inside the grid.
    pub fn contains_cell(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    fn index(&self, cell: Cell) -> Option<(usize, usize)> {
        let x = usize::try_from(cell.x()).ok()?;
        let y = usize::try_from(cell.y()).ok()?;
        (x < self.width && y < self.rows.len()).then_some((x, y))
    }

    /// Returns the glyph at `cell`, or `None` outside the grid.
    pub fn get(&self, cell: Cell) -> Option<char> {
        self.index(cell).map(|(x, y)| self.rows[y][x])
    }

    /// Writes a glyph; writes outside the grid are ignored.
    pub fn set(&mut self, cell: Cell, glyph: char) {
        if let Some((x, y)) = self.index(cell) {
            self.rows[y][x] = glyph;
        }
    }

    /// Blank and inside the grid.
    pub fn is_blank(&self, cell: Cell) -> bool {
        self.get(cell) == Some(' ')
    }

    /// Blank or outside the grid.
    pub fn is_blank_or_outside(&self, cell: Cell) -> bool {
        self.get(cell).is_none_or(|c| c == ' ')
    }

    /// Every cell of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows.len()).flat_map(move |y| {
            (0..self.width).map(move |x| Cell::new(x as i32, y as i32))
        })
    }

    /// Returns row `y` as a string.
    pub fn row_string(&self, y: usize) -> Option<String> {
        self.rows.get(y).map(|row| row.iter().collect())
    }

    /// The 3x3 neighbourhood centred on `cell`.
    pub fn window(&self, cell: Cell) -> Window<'_> {
        Window { grid: self, center: cell }
    }

    /// Copies the `width` x `height` region whose top-left corner is
    /// `origin`. Parts of the region outside this grid come out blank.
    pub fn sub_grid(&self, origin: Cell, width: usize, height: usize) -> TextGrid {
        let mut sub = TextGrid::new(width, height);
        for cell in sub.cells().collect::<Vec<_>>() {
            if let Some(glyph) = self.get(cell.offset(origin.x(), origin.y())) {
                sub.set(cell, glyph);
            }
        }
        sub
    }

    /// A blank grid of the same size holding only the glyphs of `cells`.
    pub fn isolate(&self, cells: &CellSet) -> TextGrid {
        let mut isolated = TextGrid::new(self.width, self.rows.len());
        for cell in cells.iter() {
            if let Some(glyph) = self.get(cell) {
                isolated.set(cell, glyph);
            }
        }
        isolated
    }

    /// Writes `glyph` into every cell of `cells` that lies inside the grid.
    pub fn fill_cells(&mut self, cells: &CellSet, glyph: char) {
        for cell in cells.iter() {
            self.set(cell, glyph);
        }
    }

    /// Every non-blank cell.
    pub fn non_blank_cells(&self) -> CellSet {
        self.cells().filter(|&cell| !self.is_blank(cell)).collect()
    }

    /// Whether any cell is blank.
    pub fn has_blank_cells(&self) -> bool {
        self.rows.iter().flatten().any(|&c| c == ' ')
    }

    /// Replaces the 4-connected region of glyphs equal to the seed's glyph
    /// with `glyph` and returns the replaced cells.
    ///
    /// Nothing is filled when the seed is outside the grid or already holds
    /// `glyph`.
    pub fn flood_fill(&mut self, seed: Cell, glyph: char) -> CellSet {
        let mut filled = CellSet::new();
        let Some(target) = self.get(seed) else {
            return filled;
        };
        if target == glyph {
            return filled;
        }

        let mut stack = vec![seed];
        while let Some(cell) = stack.pop() {
            if self.get(cell) != Some(target) {
                continue;
            }
            self.set(cell, glyph);
            filled.add(cell);
            stack.extend(cell.neighbours());
        }
        filled
    }

    /// Maps a cell back to its (line, column) in the loaded text, where the
    /// column counts tab-expanded positions.
    pub fn source_position(cell: Cell) -> Option<(usize, usize)> {
        let line = usize::try_from(cell.y() - BORDER).ok()?;
        let column = usize::try_from(cell.x() - BORDER).ok()?;
        Some((line, column))
    }

    fn replace_bullets(&mut self) {
        for cell in self.cells().collect::<Vec<_>>() {
            if self.is_bullet(cell) {
                self.set(cell, ' ');
                self.set(cell.east(), BULLET);
            }
        }
    }

    fn is_bullet(&self, cell: Cell) -> bool {
        matches!(self.get(cell), Some('o' | '*'))
            && self.is_blank(cell.east())
            && self.is_blank(cell.west())
            && self
                .get(cell.east().east())
                .is_some_and(char::is_alphanumeric)
    }

    fn replace_human_color_codes(&mut self) {
        for row in &mut self.rows {
            for x in 0..row.len().saturating_sub(3) {
                if row[x] != 'c' {
                    continue;
                }
                let code: String = row[x + 1..x + 4].iter().collect();
                if let Some((_, hex)) = HUMAN_COLOR_CODES.iter().find(|(name, _)| *name == code) {
                    for (offset, digit) in hex.chars().enumerate() {
                        row[x + 1 + offset] = digit;
                    }
                }
            }
        }
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            let line: String = row.iter().collect();
            writeln!(f, "{y:>3} {line}")?;
        }
        Ok(())
    }
}

/// A read-only 3x3 view centred on one cell.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    grid: &'a TextGrid,
    center: Cell,
}

impl Window<'_> {
    pub fn center(&self) -> Cell {
        self.center
    }

    /// Glyph at offset `(dx, dy)` from the centre, `None` outside the grid.
    pub fn get(&self, dx: i32, dy: i32) -> Option<char> {
        self.grid.get(self.center.offset(dx, dy))
    }
}

/// Expands tabs to the next multiple of `tab_size`.
fn expand_tabs(line: &str, tab_size: usize) -> Vec<char> {
    let tab_size = tab_size.max(1);
    let mut expanded = Vec::with_capacity(line.len());
    for c in line.chars() {
        if c == '\t' {
            let spaces = tab_size - expanded.len() % tab_size;
            expanded.extend(std::iter::repeat_n(' ', spaces));
        } else {
            expanded.push(c);
        }
    }
    expanded
}

/// Byte range in `source` of the glyph that ended up at `cell` after
/// loading with `tab_size`.
///
/// Returns `None` for border cells and for positions past the end of a
/// line. A cell inside an expanded tab maps to the tab character.
pub fn source_span(source: &str, tab_size: usize, cell: Cell) -> Option<Range<usize>> {
    let (line_index, column) = TextGrid::source_position(cell)?;
    let tab_size = tab_size.max(1);

    let mut line_start = 0;
    for (index, line) in source.split_inclusive('\n').enumerate() {
        if index == line_index {
            let mut expanded = 0;
            for (offset, c) in line.char_indices() {
                if c == '\n' || c == '\r' {
                    return None;
                }
                let width = if c == '\t' {
                    tab_size - expanded % tab_size
                } else {
                    1
                };
                if column < expanded + width {
                    let start = line_start + offset;
                    return Some(start..start + c.len_utf8());
                }
                expanded += width;
            }
            return None;
        }
        line_start += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_adds_border_and_pads_rows() {
        let grid = TextGrid::load("ab\nabcd", 8);
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 6);
        assert_eq!(grid.row_string(2).as_deref(), Some("  ab    "));
        assert_eq!(grid.row_string(3).as_deref(), Some("  abcd  "));
        assert!(grid.row_string(0).unwrap().trim().is_empty());
    }

    #[test]
    fn test_load_strips_trailing_blank_lines() {
        let grid = TextGrid::load("--\n\n   \n", 8);
        assert_eq!(grid.height(), 5);
    }

    #[test]
    fn test_load_empty_source() {
        let grid = TextGrid::load("", 8);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 4);
        assert!(grid.non_blank_cells().is_empty());
    }

    #[test]
    fn test_load_expands_tabs_to_tab_stops() {
        let grid = TextGrid::load("a\tb", 4);
        assert_eq!(grid.row_string(2).as_deref(), Some("  a   b  "));
    }

    #[test]
    fn test_load_replaces_bullets() {
        let grid = TextGrid::load("o item", 8);
        assert_eq!(grid.get(Cell::new(2, 2)), Some(' '));
        assert_eq!(grid.get(Cell::new(3, 2)), Some(BULLET));
        assert_eq!(grid.get(Cell::new(4, 2)), Some('i'));
    }

    #[test]
    fn test_load_keeps_o_inside_words() {
        let grid = TextGrid::load("go on", 8);
        assert_eq!(grid.row_string(2).as_deref(), Some("  go on  "));
    }

    #[test]
    fn test_load_replaces_human_color_codes() {
        let grid = TextGrid::load("| cRED |", 8);
        assert_eq!(grid.row_string(2).as_deref(), Some("  | cE32 |  "));
    }

    #[test]
    fn test_flood_fill_stops_at_other_glyphs() {
        let mut grid = TextGrid::from_rows(&["   ", " # ", "   "]);
        let filled = grid.flood_fill(Cell::new(0, 0), '*');
        assert_eq!(filled.len(), 8);
        assert_eq!(grid.get(Cell::new(1, 1)), Some('#'));
        assert!(!grid.has_blank_cells());
    }

    #[test]
    fn test_flood_fill_same_glyph_is_noop() {
        let mut grid = TextGrid::from_rows(&["**"]);
        assert!(grid.flood_fill(Cell::new(0, 0), '*').is_empty());
    }

    #[test]
    fn test_sub_grid_pads_outside_with_blanks() {
        let grid = TextGrid::from_rows(&["ab", "cd"]);
        let sub = grid.sub_grid(Cell::new(-1, 0), 3, 2);
        assert_eq!(sub.row_string(0).as_deref(), Some(" ab"));
        assert_eq!(sub.row_string(1).as_deref(), Some(" cd"));
    }

    #[test]
    fn test_isolate_keeps_only_selected_cells() {
        let grid = TextGrid::from_rows(&["ab", "cd"]);
        let cells: CellSet = [Cell::new(1, 0), Cell::new(0, 1)].into_iter().collect();
        let isolated = grid.isolate(&cells);
        assert_eq!(isolated.row_string(0).as_deref(), Some(" b"));
        assert_eq!(isolated.row_string(1).as_deref(), Some("c "));
    }

    #[test]
    fn test_window_reads_neighbours() {
        let grid = TextGrid::from_rows(&["abc", "def", "ghi"]);
        let window = grid.window(Cell::new(1, 1));
        assert_eq!(window.get(0, 0), Some('e'));
        assert_eq!(window.get(-1, -1), Some('a'));
        assert_eq!(window.get(1, 1), Some('i'));
        assert_eq!(grid.window(Cell::new(0, 0)).get(-1, 0), None);
    }

    #[test]
    fn test_source_span_maps_back_through_tabs() {
        let source = "ab\n\tc";
        assert_eq!(source_span(source, 8, Cell::new(3, 2)), Some(1..2));
        assert_eq!(source_span(source, 8, Cell::new(10, 3)), Some(4..5));
        assert_eq!(source_span(source, 8, Cell::new(5, 3)), Some(3..4));
        assert_eq!(source_span(source, 8, Cell::new(1, 2)), None);
        assert_eq!(source_span(source, 8, Cell::new(20, 2)), None);
    }
}
