//! Cell classification by 3x3 neighbourhood patterns.
//!
//! Every structural question about a glyph ("is this `+` a corner?", "does
//! this `-` end a line?") is answered by matching the cell's 3x3
//! neighbourhood against a family of [`GridPattern`]s. A [`Criterion`] names
//! one family; the predicates on [`TextGrid`] combine them.
//!
//! # Pattern language
//!
//! A pattern is three rows of three tokens, read north to south:
//!
//! | Token | Matches |
//! |-------|---------|
//! | `.` `~` | anything, including outside the grid |
//! | `b` | any boundary glyph `- = / \ + \| :` |
//! | `!` | anything but a boundary glyph |
//! | `-` | a horizontal line glyph `- =` |
//! | `\|` | a vertical line glyph `\| :` |
//! | `[` | anything but `\|` and `:` |
//! | `^` | `/ \ + \| :` |
//! | `(` | `- = / \ +` |
//! | `s` | `- = + \| :` |
//! | `S` | `/ \` |
//! | `1`..`8` | a glyph that can enter from that direction (see below) |
//! | `%1`..`%8` | anything that cannot |
//! | other | that literal glyph |
//!
//! Entry directions number the eight neighbours clockwise from the
//! north-west, so `2` is north, `4` is east, `6` is south and `8` is west.
//!
//! Outside the grid, negated tokens and wildcards match while positive
//! classes and literals do not.

use std::sync::LazyLock;

use scrawl_core::cell::Cell;

use crate::{
    cellset::CellSet,
    error::GeometryError,
    grid::{TextGrid, Window},
};

pub(crate) const BOUNDARY_GLYPHS: &str = "/\\|-*=:";
pub(crate) const DASHED_GLYPHS: &str = ":~=";
const HORIZONTAL_LINE_GLYPHS: &str = "-=";
const VERTICAL_LINE_GLYPHS: &str = "|:";
const POINT_MARKER_GLYPHS: &str = "*";

const ENTRY_POINT_GLYPHS: [&str; 8] = [
    "\\", "|:+\\/", "/", "-=+\\/", "\\", "|:+\\/", "/", "-=+\\/",
];

fn is_in(glyph: Option<char>, class: &str) -> bool {
    glyph.is_some_and(|c| class.contains(c))
}

/// One position of a [`GridPattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Any,
    Boundary,
    NotBoundary,
    HorizontalLine,
    VerticalLine,
    NotVerticalLine,
    NotHorizontalBoundary,
    NotVerticalBoundary,
    Straight,
    Diagonal,
    EntryPoint(usize),
    NoEntryPoint(usize),
    Literal(char),
}

impl Token {
    fn matches(self, glyph: Option<char>) -> bool {
        match self {
            Self::Any => true,
            Self::Boundary => is_in(glyph, "-=/\\+|:"),
            Self::NotBoundary => !is_in(glyph, "-=/\\+|:"),
            Self::HorizontalLine => is_in(glyph, HORIZONTAL_LINE_GLYPHS),
            Self::VerticalLine => is_in(glyph, VERTICAL_LINE_GLYPHS),
            Self::NotVerticalLine => !is_in(glyph, VERTICAL_LINE_GLYPHS),
            Self::NotHorizontalBoundary => is_in(glyph, "/\\+|:"),
            Self::NotVerticalBoundary => is_in(glyph, "-=/\\+"),
            Self::Straight => is_in(glyph, "-=+|:"),
            Self::Diagonal => is_in(glyph, "/\\"),
            Self::EntryPoint(n) => is_in(glyph, ENTRY_POINT_GLYPHS[n - 1]),
            Self::NoEntryPoint(n) => !is_in(glyph, ENTRY_POINT_GLYPHS[n - 1]),
            Self::Literal(c) => glyph == Some(c),
        }
    }
}

/// A 3x3 neighbourhood pattern.
///
/// # Examples
///
/// ```
/// use scrawl_core::cell::Cell;
/// use scrawl_parser::{classify::GridPattern, grid::TextGrid};
///
/// let corner = GridPattern::new([".[.", "~+(", ".^."]);
/// let grid = TextGrid::from_rows(&["   ", " +-", " | "]);
/// assert!(corner.matches(&grid.window(Cell::new(1, 1))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPattern {
    rows: [[Token; 3]; 3],
}

impl GridPattern {
    /// Compiles a pattern from three rows in the pattern language.
    ///
    /// # Panics
    ///
    /// Panics when a row does not hold exactly three tokens. Patterns are
    /// compile-time constants, so this is a programming error.
    pub fn new(rows: [&str; 3]) -> Self {
        Self {
            rows: rows.map(|row| {
                let tokens = parse_row(row);
                tokens
                    .try_into()
                    .unwrap_or_else(|_| panic!("pattern row `{row}` must hold three tokens"))
            }),
        }
    }

    /// Whether the neighbourhood matches every position.
    pub fn matches(&self, window: &Window<'_>) -> bool {
        self.rows.iter().zip(-1..=1).all(|(row, dy)| {
            row.iter()
                .zip(-1..=1)
                .all(|(token, dx)| token.matches(window.get(dx, dy)))
        })
    }
}

fn parse_row(row: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(3);
    let mut chars = row.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            '.' | '~' => Token::Any,
            'b' => Token::Boundary,
            '!' => Token::NotBoundary,
            '-' => Token::HorizontalLine,
            '|' => Token::VerticalLine,
            '[' => Token::NotVerticalLine,
            '^' => Token::NotHorizontalBoundary,
            '(' => Token::NotVerticalBoundary,
            's' => Token::Straight,
            'S' => Token::Diagonal,
            '1'..='8' => Token::EntryPoint(entry_index(c)),
            '%' => match chars.next() {
                Some(digit @ '1'..='8') => Token::NoEntryPoint(entry_index(digit)),
                other => panic!("`%` must be followed by an entry point, found {other:?}"),
            },
            literal => Token::Literal(literal),
        };
        tokens.push(token);
    }
    tokens
}

fn entry_index(digit: char) -> usize {
    digit.to_digit(10).map_or(0, |d| d as usize)
}

/// A named family of [`GridPattern`]s; a cell meets the criterion when any
/// of them matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Cross,
    K,
    InverseK,
    T,
    InverseT,
    NormalCorner1,
    NormalCorner2,
    NormalCorner3,
    NormalCorner4,
    RoundCorner1,
    RoundCorner2,
    RoundCorner3,
    RoundCorner4,
    Stub,
    VerticalLinesEnd,
    HorizontalLinesEnd,
    HorizontalCrossOnLine,
    VerticalCrossOnLine,
    HorizontalStarOnLine,
    VerticalStarOnLine,
    LoneDiagonal,
}

impl Criterion {
    const ALL: [Criterion; 21] = [
        Self::Cross,
        Self::K,
        Self::InverseK,
        Self::T,
        Self::InverseT,
        Self::NormalCorner1,
        Self::NormalCorner2,
        Self::NormalCorner3,
        Self::NormalCorner4,
        Self::RoundCorner1,
        Self::RoundCorner2,
        Self::RoundCorner3,
        Self::RoundCorner4,
        Self::Stub,
        Self::VerticalLinesEnd,
        Self::HorizontalLinesEnd,
        Self::HorizontalCrossOnLine,
        Self::VerticalCrossOnLine,
        Self::HorizontalStarOnLine,
        Self::VerticalStarOnLine,
        Self::LoneDiagonal,
    ];

    fn rows(self) -> &'static [[&'static str; 3]] {
        match self {
            Self::Cross => &[[".6.", "4+8", ".2."]],
            Self::K => &[[".6.", "%4+8", ".2."]],
            Self::InverseK => &[[".6.", "4+%8", ".2."]],
            Self::T => &[[".%6.", "4+8", ".2."]],
            Self::InverseT => &[[".6.", "4+8", ".%2."]],
            Self::NormalCorner1 => &[[".[.", "~+(", ".^."]],
            Self::NormalCorner2 => &[[".[.", "(+~", ".^."]],
            Self::NormalCorner3 => &[[".^.", "(+~", ".[."]],
            Self::NormalCorner4 => &[[".^.", "~+(", ".[."]],
            Self::RoundCorner1 => &[[".[.", "~/4", ".2."]],
            Self::RoundCorner2 => &[[".[.", "4\\~", ".2."]],
            Self::RoundCorner3 => &[[".6.", "4/~", ".[."]],
            Self::RoundCorner4 => &[[".6.", "~\\8", ".[."]],
            Self::Stub => &[
                ["!^!", "!+!", ".!."],
                ["!^!", "!+!", ".-."],
                ["!!.", "(+!", "!!."],
                ["!!.", "(+|", "!!."],
                [".!.", "!+!", "!^!"],
                [".-.", "!+!", "!^!"],
                [".!!", "!+(", ".!!"],
                [".!!", "|+(", ".!!"],
            ],
            Self::VerticalLinesEnd => &[
                [".^.", ".|.", ".!."],
                [".^.", ".|.", ".-."],
                [".!.", ".|.", ".^."],
                [".-.", ".|.", ".^."],
            ],
            Self::HorizontalLinesEnd => &[
                ["...", "(-!", "..."],
                ["...", "(-|", "..."],
                ["...", "!-(", "..."],
                ["...", "|-(", "..."],
            ],
            Self::HorizontalCrossOnLine => &[["...", "(+(", "..."]],
            Self::VerticalCrossOnLine => &[[".^.", ".+.", ".^."]],
            Self::HorizontalStarOnLine => &[
                ["...", "(*(", "..."],
                ["...", "!*(", "..."],
                ["...", "(*!", "..."],
            ],
            Self::VerticalStarOnLine => &[
                [".^.", ".*.", ".^."],
                [".!.", ".*.", ".^."],
                [".^.", ".*.", ".!."],
            ],
            Self::LoneDiagonal => &[[".%6%7", "%4/%8", "%3%2."], ["%1%6.", "%4\\%8", ".%2%5"]],
        }
    }

    fn patterns(self) -> &'static [GridPattern] {
        static COMPILED: LazyLock<Vec<Vec<GridPattern>>> = LazyLock::new(|| {
            Criterion::ALL
                .iter()
                .map(|criterion| {
                    criterion
                        .rows()
                        .iter()
                        .map(|rows| GridPattern::new(*rows))
                        .collect()
                })
                .collect()
        });
        &COMPILED[self as usize]
    }

    /// Whether any pattern of the family matches the neighbourhood.
    pub fn is_met_by(self, window: &Window<'_>) -> bool {
        self.patterns().iter().any(|pattern| pattern.matches(window))
    }
}

/// Structural predicates over cells.
///
/// All predicates are pure functions of the 3x3 neighbourhood, so a cell's
/// classification never depends on how often or in which order it is asked.
impl TextGrid {
    fn meets(&self, cell: Cell, criterion: Criterion) -> bool {
        criterion.is_met_by(&self.window(cell))
    }

    pub fn is_cross(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::Cross)
    }

    pub fn is_k(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::K)
    }

    pub fn is_inverse_k(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::InverseK)
    }

    pub fn is_t(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::T)
    }

    pub fn is_inverse_t(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::InverseT)
    }

    /// Any junction of three or four lines.
    pub fn is_intersection(&self, cell: Cell) -> bool {
        self.is_cross(cell)
            || self.is_k(cell)
            || self.is_t(cell)
            || self.is_inverse_k(cell)
            || self.is_inverse_t(cell)
    }

    pub fn is_normal_corner(&self, cell: Cell) -> bool {
        [
            Criterion::NormalCorner1,
            Criterion::NormalCorner2,
            Criterion::NormalCorner3,
            Criterion::NormalCorner4,
        ]
        .into_iter()
        .any(|criterion| self.meets(cell, criterion))
    }

    pub fn is_round_corner(&self, cell: Cell) -> bool {
        [
            Criterion::RoundCorner1,
            Criterion::RoundCorner2,
            Criterion::RoundCorner3,
            Criterion::RoundCorner4,
        ]
        .into_iter()
        .any(|criterion| self.meets(cell, criterion))
    }

    /// Corner opening south-east (`+` or `/` with lines east and south).
    pub fn is_corner_1(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::NormalCorner1) || self.meets(cell, Criterion::RoundCorner1)
    }

    /// Corner opening south-west.
    pub fn is_corner_2(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::NormalCorner2) || self.meets(cell, Criterion::RoundCorner2)
    }

    /// Corner opening north-west.
    pub fn is_corner_3(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::NormalCorner3) || self.meets(cell, Criterion::RoundCorner3)
    }

    /// Corner opening north-east.
    pub fn is_corner_4(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::NormalCorner4) || self.meets(cell, Criterion::RoundCorner4)
    }

    pub fn is_corner(&self, cell: Cell) -> bool {
        self.is_normal_corner(cell) || self.is_round_corner(cell)
    }

    pub fn is_stub(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::Stub)
    }

    pub fn is_horizontal_lines_end(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::HorizontalLinesEnd)
    }

    pub fn is_vertical_lines_end(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::VerticalLinesEnd)
    }

    /// The last cell of a line: a horizontal or vertical end, or a stub.
    pub fn is_lines_end(&self, cell: Cell) -> bool {
        self.is_horizontal_lines_end(cell)
            || self.is_vertical_lines_end(cell)
            || self.is_stub(cell)
    }

    pub fn is_horizontal_cross_on_line(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::HorizontalCrossOnLine)
    }

    pub fn is_vertical_cross_on_line(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::VerticalCrossOnLine)
    }

    /// A `+` in the middle of a straight run.
    pub fn is_cross_on_line(&self, cell: Cell) -> bool {
        self.is_horizontal_cross_on_line(cell) || self.is_vertical_cross_on_line(cell)
    }

    pub fn is_horizontal_star_on_line(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::HorizontalStarOnLine)
    }

    pub fn is_vertical_star_on_line(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::VerticalStarOnLine)
    }

    /// A `*` point marker sitting on a line.
    pub fn is_star_on_line(&self, cell: Cell) -> bool {
        self.is_horizontal_star_on_line(cell) || self.is_vertical_star_on_line(cell)
    }

    pub fn is_lone_diagonal(&self, cell: Cell) -> bool {
        self.meets(cell, Criterion::LoneDiagonal)
    }

    /// Whether the glyph belongs to a drawn outline rather than to text.
    ///
    /// `+`, `/` and `\` only count when their neighbourhood makes them a
    /// junction, corner, stub or a crossing on a straight run. The other
    /// boundary glyphs count unless they are a diagonal with no neighbours.
    pub fn is_boundary(&self, cell: Cell) -> bool {
        match self.get(cell) {
            Some('+' | '\\' | '/') => {
                self.is_intersection(cell)
                    || self.is_corner(cell)
                    || self.is_stub(cell)
                    || self.is_cross_on_line(cell)
            }
            Some(c) if BOUNDARY_GLYPHS.contains(c) => !self.is_lone_diagonal(cell),
            _ => false,
        }
    }

    pub fn is_horizontal_line(&self, cell: Cell) -> bool {
        is_in(self.get(cell), HORIZONTAL_LINE_GLYPHS)
    }

    pub fn is_vertical_line(&self, cell: Cell) -> bool {
        is_in(self.get(cell), VERTICAL_LINE_GLYPHS)
    }

    pub fn is_line(&self, cell: Cell) -> bool {
        self.is_horizontal_line(cell) || self.is_vertical_line(cell)
    }

    /// Both horizontal neighbours are horizontal line glyphs.
    pub fn is_on_horizontal_line(&self, cell: Cell) -> bool {
        self.is_horizontal_line(cell.west()) && self.is_horizontal_line(cell.east())
    }

    /// Both vertical neighbours are vertical line glyphs.
    pub fn is_on_vertical_line(&self, cell: Cell) -> bool {
        self.is_vertical_line(cell.north()) && self.is_vertical_line(cell.south())
    }

    pub fn is_north_arrowhead(&self, cell: Cell) -> bool {
        self.get(cell) == Some('^')
    }

    /// `v` or `V` only count when a vertical line arrives from the north.
    pub fn is_south_arrowhead(&self, cell: Cell) -> bool {
        matches!(self.get(cell), Some('v' | 'V')) && self.is_vertical_line(cell.north())
    }

    pub fn is_east_arrowhead(&self, cell: Cell) -> bool {
        self.get(cell) == Some('>')
    }

    pub fn is_west_arrowhead(&self, cell: Cell) -> bool {
        self.get(cell) == Some('<')
    }

    pub fn is_arrowhead(&self, cell: Cell) -> bool {
        self.is_north_arrowhead(cell)
            || self.is_south_arrowhead(cell)
            || self.is_east_arrowhead(cell)
            || self.is_west_arrowhead(cell)
    }

    pub fn is_point_marker(&self, cell: Cell) -> bool {
        is_in(self.get(cell), POINT_MARKER_GLYPHS)
    }

    /// Cells where a polyline needs a vertex.
    pub fn is_point_cell(&self, cell: Cell) -> bool {
        self.is_corner(cell)
            || self.is_intersection(cell)
            || self.is_stub(cell)
            || self.is_lines_end(cell)
    }

    pub fn contains_dashed_glyph(&self, cell: Cell) -> bool {
        is_in(self.get(cell), DASHED_GLYPHS)
    }

    /// Whether the glyph at `cell` can connect toward its neighbour in
    /// entry direction `entry` (1..=8).
    pub fn has_entry_point(&self, cell: Cell, entry: usize) -> bool {
        (1..=8).contains(&entry) && is_in(self.get(cell), ENTRY_POINT_GLYPHS[entry - 1])
    }

    /// Every boundary cell of the grid.
    pub fn boundary_cells(&self) -> CellSet {
        self.cells().filter(|&cell| self.is_boundary(cell)).collect()
    }

    /// Every arrowhead cell of the grid.
    pub fn arrowhead_cells(&self) -> CellSet {
        self.cells().filter(|&cell| self.is_arrowhead(cell)).collect()
    }

    /// Every `*` that sits on a line.
    pub fn point_markers_on_line(&self) -> CellSet {
        self.cells()
            .filter(|&cell| self.is_point_marker(cell) && self.is_star_on_line(cell))
            .collect()
    }

    /// Rewrites letters and digits drawn over lines into the line glyph
    /// they interrupt: `+` over a crossing, `-` or `|` over a straight run.
    pub fn replace_type_on_line(&mut self) {
        for cell in self.cells().collect::<Vec<_>>() {
            if !self.get(cell).is_some_and(char::is_alphanumeric) {
                continue;
            }
            let horizontal = self.is_on_horizontal_line(cell);
            let vertical = self.is_on_vertical_line(cell);
            match (horizontal, vertical) {
                (true, true) => self.set(cell, '+'),
                (true, false) => self.set(cell, '-'),
                (false, true) => self.set(cell, '|'),
                (false, false) => {}
            }
        }
    }

    /// Rewrites `*` markers sitting on lines into the line glyph that
    /// continues through them.
    pub fn replace_point_markers_on_line(&mut self) {
        for cell in self.cells().collect::<Vec<_>>() {
            if !self.is_point_marker(cell) || !self.is_star_on_line(cell) {
                continue;
            }
            let horizontal = self.is_horizontal_star_on_line(cell);
            let vertical = self.is_vertical_star_on_line(cell);
            match (horizontal, vertical) {
                (true, true) => self.set(cell, '+'),
                (true, false) => self.set(cell, '-'),
                (false, true) => self.set(cell, '|'),
                (false, false) => {}
            }
        }
    }

    /// The boundary neighbours a trace may continue to from `cell`, minus
    /// `blocked` (normally the cell it came from).
    ///
    /// Rules are tried in order: junction, corner, straight line, stub, and
    /// crossing on a line. A junction continues into each neighbour whose
    /// glyph can enter it; a corner continues along its two arms; lines,
    /// stubs and crossings continue into boundary neighbours along their
    /// axis.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnfollowableCell`] when no rule applies.
    pub fn follow_cell(&self, cell: Cell, blocked: Option<Cell>) -> Result<CellSet, GeometryError> {
        let mut next = CellSet::new();
        if self.is_intersection(cell) {
            for (neighbour, entry) in [
                (cell.north(), 6),
                (cell.south(), 2),
                (cell.east(), 8),
                (cell.west(), 4),
            ] {
                if self.has_entry_point(neighbour, entry) {
                    next.add(neighbour);
                }
            }
        } else if self.is_corner(cell) {
            let arms = if self.is_corner_1(cell) {
                Some([cell.south(), cell.east()])
            } else if self.is_corner_2(cell) {
                Some([cell.south(), cell.west()])
            } else if self.is_corner_3(cell) {
                Some([cell.north(), cell.west()])
            } else if self.is_corner_4(cell) {
                Some([cell.north(), cell.east()])
            } else {
                None
            };
            next.extend(arms.into_iter().flatten());
        } else if self.is_horizontal_line(cell) {
            self.add_boundaries(&mut next, [cell.east(), cell.west()]);
        } else if self.is_vertical_line(cell) {
            self.add_boundaries(&mut next, [cell.north(), cell.south()]);
        } else if self.is_stub(cell) {
            self.add_boundaries(&mut next, cell.neighbours());
        } else if self.is_horizontal_cross_on_line(cell) {
            self.add_boundaries(&mut next, [cell.east(), cell.west()]);
        } else if self.is_vertical_cross_on_line(cell) {
            self.add_boundaries(&mut next, [cell.north(), cell.south()]);
        } else {
            return Err(GeometryError::UnfollowableCell {
                cell,
                glyph: self.get(cell).unwrap_or(' '),
            });
        }

        if let Some(blocked) = blocked {
            next.remove(blocked);
        }
        Ok(next)
    }

    fn add_boundaries(&self, next: &mut CellSet, candidates: impl IntoIterator<Item = Cell>) {
        next.extend(
            candidates
                .into_iter()
                .filter(|&candidate| self.is_boundary(candidate)),
        );
    }
}
