//! In-diagram colour codes and markup tags.
//!
//! A colour code is `c` followed by three or six upper-case hex digits
//! (`cE32`, `cFFAA00`); a markup tag is a short name in braces (`{d}`).
//! Both are found on the original grid and applied to the smallest closed
//! shape whose outline contains the centre of the code's first cell.

use log::{debug, trace};
use winnow::{
    ModalResult, Parser,
    combinator::{alt, delimited, preceded},
    token::{take_till, take_while},
};

use scrawl_core::{
    cell::Cell,
    color::Color,
    geometry::{CellMetrics, Point},
    shape::{Shape, ShapeKind},
};

use crate::grid::TextGrid;

/// Tag names and the shape kinds they select.
const MARKUP_TAGS: [(&str, ShapeKind); 7] = [
    ("d", ShapeKind::Document),
    ("s", ShapeKind::Storage),
    ("io", ShapeKind::Io),
    ("c", ShapeKind::Decision),
    ("mo", ShapeKind::ManualOperation),
    ("tr", ShapeKind::Trapezoid),
    ("o", ShapeKind::Ellipse),
];

/// A colour code found in the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCode {
    cell: Cell,
    color: Color,
    len: usize,
}

impl ColorCode {
    /// The cell holding the leading `c`.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Number of cells the code occupies.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A known markup tag found in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupTag {
    cell: Cell,
    kind: ShapeKind,
    len: usize,
}

impl MarkupTag {
    /// The cell holding the opening brace.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Number of cells the tag occupies, braces included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The shape kind a tag name selects.
pub fn shape_kind_for_tag(name: &str) -> Option<ShapeKind> {
    MARKUP_TAGS
        .iter()
        .find(|(tag, _)| *tag == name)
        .map(|&(_, kind)| kind)
}

fn is_upper_hex(c: char) -> bool {
    c.is_ascii_digit() || ('A'..='F').contains(&c)
}

/// `c` followed by six, or failing that three, upper-case hex digits.
fn color_code(input: &mut &str) -> ModalResult<Color> {
    preceded(
        'c',
        alt((take_while(6, is_upper_hex), take_while(3, is_upper_hex))),
    )
    .verify_map(Color::from_hex_digits)
    .parse_next(input)
}

/// `{name}` with a non-empty name.
fn markup_tag<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    delimited('{', take_till(1.., |c: char| c == '}'), '}').parse_next(input)
}

/// Runs `parser` at every cell holding `lead`, row by row.
fn scan_rows<O>(
    grid: &TextGrid,
    lead: char,
    mut parser: impl FnMut(&mut &str) -> ModalResult<O>,
) -> Vec<(Cell, O, usize)> {
    let mut found = Vec::new();
    for y in 0..grid.height() {
        let Some(row) = grid.row_string(y) else {
            continue;
        };
        for (x, (offset, glyph)) in row.char_indices().enumerate() {
            if glyph != lead {
                continue;
            }
            let mut rest = &row[offset..];
            let before = rest.chars().count();
            if let Ok(value) = parser(&mut rest) {
                let len = before - rest.chars().count();
                let cell = Cell::new(x as i32, y as i32);
                found.push((cell, value, len));
            }
        }
    }
    found
}

/// Every colour code of the grid.
pub fn find_color_codes(grid: &TextGrid) -> Vec<ColorCode> {
    let codes: Vec<ColorCode> = scan_rows(grid, 'c', color_code)
        .into_iter()
        .map(|(cell, color, len)| ColorCode { cell, color, len })
        .collect();
    trace!(codes = codes.len(); "Found colour codes");
    codes
}

/// Every known markup tag of the grid. Unknown names are skipped.
pub fn find_markup_tags(grid: &TextGrid) -> Vec<MarkupTag> {
    let tags: Vec<MarkupTag> = scan_rows(grid, '{', |input: &mut &str| {
        markup_tag.map(str::to_owned).parse_next(input)
    })
    .into_iter()
    .filter_map(|(cell, name, len)| {
        shape_kind_for_tag(&name).map(|kind| MarkupTag { cell, kind, len })
    })
    .collect();
    trace!(tags = tags.len(); "Found markup tags");
    tags
}

/// Index of the smallest closed outline containing `point`. Arrowheads
/// never count.
pub fn smallest_containing(shapes: &[Shape], point: Point) -> Option<usize> {
    shapes
        .iter()
        .enumerate()
        .filter(|(_, shape)| {
            shape.is_closed() && shape.kind() != ShapeKind::Arrowhead && shape.contains(point)
        })
        .min_by(|(_, a), (_, b)| a.area().total_cmp(&b.area()))
        .map(|(index, _)| index)
}

/// Fills the shape around each colour code with its colour.
pub fn apply_color_codes(shapes: &mut [Shape], codes: &[ColorCode], metrics: CellMetrics) {
    let mut applied = 0;
    for code in codes {
        if let Some(index) = smallest_containing(shapes, metrics.cell_center(code.cell)) {
            shapes[index].set_fill_color(code.color);
            applied += 1;
        }
    }
    debug!(codes = codes.len(), applied = applied; "Applied colour codes");
}

/// Gives the shape around each markup tag the tag's kind.
pub fn apply_markup_tags(shapes: &mut [Shape], tags: &[MarkupTag], metrics: CellMetrics) {
    let mut applied = 0;
    for tag in tags {
        if let Some(index) = smallest_containing(shapes, metrics.cell_center(tag.cell)) {
            shapes[index].set_kind(tag.kind);
            applied += 1;
        }
    }
    debug!(tags = tags.len(), applied = applied; "Applied markup tags");
}

#[cfg(test)]
mod tests {
    use scrawl_core::shape::{PointKind, ShapePoint};

    use super::*;

    fn rectangle(min: (f32, f32), max: (f32, f32)) -> Shape {
        let mut shape = Shape::new_closed();
        for (x, y) in [(min.0, min.1), (max.0, min.1), (max.0, max.1), (min.0, max.1)] {
            shape.push_point(ShapePoint::new(Point::new(x, y), PointKind::Normal));
        }
        shape
    }

    #[test]
    fn test_color_code_parser() {
        let mut input = "cFFAA00 rest";
        assert_eq!(color_code(&mut input).ok(), Color::from_hex_digits("FFAA00"));
        assert_eq!(input, " rest");

        let mut input = "cE32|";
        assert_eq!(color_code(&mut input).ok(), Color::from_hex_digits("E32"));
        assert_eq!(input, "|");

        assert!(color_code(&mut "cab1").is_err());
        assert!(color_code(&mut "cE3").is_err());
        assert!(color_code(&mut "xE32").is_err());
    }

    #[test]
    fn test_markup_tag_parser() {
        let mut input = "{io} text";
        assert_eq!(markup_tag(&mut input).ok(), Some("io"));
        assert_eq!(input, " text");
        assert!(markup_tag(&mut "{}").is_err());
        assert!(markup_tag(&mut "{open").is_err());
    }

    #[test]
    fn test_find_color_codes() {
        let grid = TextGrid::load("| cRED  cFFAA00 |\n| cyan |", 8);
        let codes = find_color_codes(&grid);

        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0].cell(), Cell::new(4, 2));
        assert_eq!(codes[0].len(), 4);
        assert_eq!(Some(codes[0].color()), Color::from_hex_digits("EE3322"));
        assert_eq!(codes[1].cell(), Cell::new(10, 2));
        assert_eq!(codes[1].len(), 7);
    }

    #[test]
    fn test_find_markup_tags() {
        let grid = TextGrid::load("{d} {x} {mo}", 8);
        let tags = find_markup_tags(&grid);

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].cell(), Cell::new(2, 2));
        assert_eq!(tags[0].kind(), ShapeKind::Document);
        assert_eq!(tags[0].len(), 3);
        assert_eq!(tags[1].kind(), ShapeKind::ManualOperation);
        assert_eq!(tags[1].len(), 4);
    }

    #[test]
    fn test_shape_kind_for_tag() {
        assert_eq!(shape_kind_for_tag("c"), Some(ShapeKind::Decision));
        assert_eq!(shape_kind_for_tag("o"), Some(ShapeKind::Ellipse));
        assert_eq!(shape_kind_for_tag("oo"), None);
    }

    #[test]
    fn test_smallest_shape_gets_the_color() {
        let metrics = CellMetrics::default();
        let mut shapes = vec![
            rectangle((15.0, 21.0), (205.0, 147.0)),
            rectangle((45.0, 49.0), (105.0, 91.0)),
        ];
        let red = Color::from_rgb8(0xEE, 0x33, 0x22);
        let codes = [ColorCode {
            cell: Cell::new(6, 4),
            color: red,
            len: 4,
        }];
        apply_color_codes(&mut shapes, &codes, metrics);

        assert_eq!(shapes[0].fill_color(), None);
        assert_eq!(shapes[1].fill_color(), Some(red));
    }

    #[test]
    fn test_tag_outside_every_shape_is_ignored() {
        let mut shapes = vec![rectangle((45.0, 49.0), (105.0, 91.0))];
        let tags = [MarkupTag {
            cell: Cell::new(20, 20),
            kind: ShapeKind::Storage,
            len: 3,
        }];
        apply_markup_tags(&mut shapes, &tags, CellMetrics::default());
        assert_eq!(shapes[0].kind(), ShapeKind::Simple);
    }

    #[test]
    fn test_open_shapes_never_match() {
        let mut line = Shape::new_open();
        line.push_point(ShapePoint::new(Point::new(0.0, 0.0), PointKind::Normal));
        line.push_point(ShapePoint::new(Point::new(100.0, 100.0), PointKind::Normal));
        assert_eq!(smallest_containing(&[line], Point::new(50.0, 50.0)), None);
    }
}
