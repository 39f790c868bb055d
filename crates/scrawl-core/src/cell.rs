//! Character-grid coordinates.
//!
//! A [`Cell`] addresses one glyph in a text grid. Cells are plain integer
//! coordinates; they carry no glyph and no knowledge of grid bounds, so
//! neighbours of an edge cell may lie outside the grid.
//!
//! Cells order row-major (top to bottom, then left to right). Every ordered
//! cell collection in the workspace relies on this, which keeps iteration
//! and therefore reconstruction output deterministic.

use std::{cmp::Ordering, fmt};

/// A column/row coordinate in a character grid.
///
/// # Examples
///
/// ```
/// # use scrawl_core::cell::Cell;
/// let cell = Cell::new(3, 4);
/// assert_eq!(cell.north(), Cell::new(3, 3));
/// assert_eq!(cell.east(), Cell::new(4, 4));
/// assert!(Cell::new(9, 0) < Cell::new(0, 1));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a cell at column `x`, row `y`.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the column.
    pub fn x(self) -> i32 {
        self.x
    }

    /// Returns the row.
    pub fn y(self) -> i32 {
        self.y
    }

    /// Returns the cell offset by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn north(self) -> Self {
        self.offset(0, -1)
    }

    pub fn south(self) -> Self {
        self.offset(0, 1)
    }

    pub fn east(self) -> Self {
        self.offset(1, 0)
    }

    pub fn west(self) -> Self {
        self.offset(-1, 0)
    }

    /// Returns the four edge-adjacent neighbours in north, south, east, west order.
    pub fn neighbours(self) -> [Cell; 4] {
        [self.north(), self.south(), self.east(), self.west()]
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
