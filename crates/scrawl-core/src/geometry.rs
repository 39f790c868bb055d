//! Geometric primitives for reconstructed diagrams.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in pixel space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned bounding box
//! - [`CellMetrics`] - The mapping between grid [`Cell`]s and pixel space
//!
//! # Coordinate System
//!
//! Pixel space matches SVG: origin at the top-left, X grows rightward and
//! Y grows downward. Cell `(0, 0)` covers the pixel rectangle
//! `[0, cell_width) x [0, cell_height)`.

use crate::cell::Cell;

/// A 2D point in pixel space.
///
/// # Examples
///
/// ```
/// # use scrawl_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Returns the point halfway between `self` and `other`
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Strictly above `other` (smaller y).
    pub fn is_north_of(self, other: Point) -> bool {
        self.y < other.y
    }

    /// Strictly below `other` (larger y).
    pub fn is_south_of(self, other: Point) -> bool {
        self.y > other.y
    }

    /// Strictly right of `other` (larger x).
    pub fn is_east_of(self, other: Point) -> bool {
        self.x > other.x
    }

    /// Strictly left of `other` (smaller x).
    pub fn is_west_of(self, other: Point) -> bool {
        self.x < other.x
    }

    /// Converts into a [`kurbo::Point`] for path construction.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(f64::from(self.x), f64::from(self.y))
    }
}

/// Width and height dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }
}

/// An axis-aligned bounding box.
///
/// # Examples
///
/// ```
/// # use scrawl_core::geometry::{Bounds, Point};
/// let bounds = Bounds::from_points([Point::new(4.0, 2.0), Point::new(1.0, 6.0)]).unwrap();
/// assert_eq!(bounds.min_x(), 1.0);
/// assert_eq!(bounds.max_y(), 6.0);
/// assert_eq!(bounds.width(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from explicit edges.
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns the smallest bounds containing every point, or `None` when
    /// the iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let seed = Self::new(first.x, first.y, first.x, first.y);
        Some(points.fold(seed, |bounds, p| Bounds {
            min_x: bounds.min_x.min(p.x),
            min_y: bounds.min_y.min(p.y),
            max_x: bounds.max_x.max(p.x),
            max_y: bounds.max_y.max(p.y),
        }))
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Merges two bounds, returning the smallest bounds containing both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Whether `point` lies inside or on the edge of the bounds
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

/// Maps grid cells onto pixel rectangles of a fixed size.
///
/// Midpoints use integer halving of the cell size, so with the default
/// 10x14 cells the centre of cell `(x, y)` is `(10x + 5, 14y + 7)`.
///
/// # Examples
///
/// ```
/// # use scrawl_core::{cell::Cell, geometry::CellMetrics};
/// let metrics = CellMetrics::default();
/// let cell = Cell::new(3, 2);
/// assert_eq!(metrics.cell_mid_x(cell), 35.0);
/// assert_eq!(metrics.cell_mid_y(cell), 35.0);
/// assert_eq!(metrics.cell_for(metrics.cell_center(cell)), cell);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    cell_width: i32,
    cell_height: i32,
}

impl CellMetrics {
    /// Default cell width in pixels.
    pub const DEFAULT_CELL_WIDTH: u32 = 10;
    /// Default cell height in pixels.
    pub const DEFAULT_CELL_HEIGHT: u32 = 14;

    /// Creates metrics for cells of the given pixel size.
    ///
    /// Sizes are clamped to at least one pixel.
    pub fn new(cell_width: u32, cell_height: u32) -> Self {
        let clamp = |value: u32| i32::try_from(value.max(1)).unwrap_or(i32::MAX);
        Self {
            cell_width: clamp(cell_width),
            cell_height: clamp(cell_height),
        }
    }

    pub fn cell_width(self) -> f32 {
        self.cell_width as f32
    }

    pub fn cell_height(self) -> f32 {
        self.cell_height as f32
    }

    /// The smaller of the two cell dimensions.
    pub fn min_dimension(self) -> f32 {
        self.cell_width.min(self.cell_height) as f32
    }

    pub fn cell_min_x(self, cell: Cell) -> f32 {
        (cell.x() * self.cell_width) as f32
    }

    pub fn cell_min_y(self, cell: Cell) -> f32 {
        (cell.y() * self.cell_height) as f32
    }

    pub fn cell_max_x(self, cell: Cell) -> f32 {
        ((cell.x() + 1) * self.cell_width) as f32
    }

    pub fn cell_max_y(self, cell: Cell) -> f32 {
        ((cell.y() + 1) * self.cell_height) as f32
    }

    pub fn cell_mid_x(self, cell: Cell) -> f32 {
        (cell.x() * self.cell_width + self.cell_width / 2) as f32
    }

    pub fn cell_mid_y(self, cell: Cell) -> f32 {
        (cell.y() * self.cell_height + self.cell_height / 2) as f32
    }

    /// Returns the centre point of `cell`.
    pub fn cell_center(self, cell: Cell) -> Point {
        Point::new(self.cell_mid_x(cell), self.cell_mid_y(cell))
    }

    /// Returns the pixel rectangle covered by `cell`.
    pub fn cell_bounds(self, cell: Cell) -> Bounds {
        Bounds::new(
            self.cell_min_x(cell),
            self.cell_min_y(cell),
            self.cell_max_x(cell),
            self.cell_max_y(cell),
        )
    }

    /// Returns the cell containing `point`.
    pub fn cell_for(self, point: Point) -> Cell {
        Cell::new(
            point.x().floor() as i32 / self.cell_width,
            point.y().floor() as i32 / self.cell_height,
        )
    }

    /// Returns the pixel size of a grid of `columns` x `rows` cells.
    pub fn grid_size(self, columns: usize, rows: usize) -> Size {
        Size::new(
            columns as f32 * self.cell_width(),
            rows as f32 * self.cell_height(),
        )
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CELL_WIDTH, Self::DEFAULT_CELL_HEIGHT)
    }
}
