//! Vector shapes recovered from a diagram.
//!
//! A [`Shape`] is an ordered polygon or polyline of [`ShapePoint`]s in pixel
//! space together with the presentation attributes the grid implied: whether
//! it is closed, whether it was drawn with dashed glyphs, its fill colour and
//! its [`ShapeKind`].

use std::fmt;

use kurbo::{BezPath, Shape as _};

use crate::{
    color::Color,
    geometry::{Bounds, Point},
};

/// How a vertex should be rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    /// A sharp vertex.
    #[default]
    Normal,
    /// A vertex drawn as a rounded corner.
    Round,
}

/// A vertex of a [`Shape`].
///
/// A locked point has been snapped onto an anchor (an arrowhead or a
/// junction) and must not be moved by later end-point corrections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePoint {
    position: Point,
    kind: PointKind,
    locked: bool,
}

impl ShapePoint {
    pub fn new(position: Point, kind: PointKind) -> Self {
        Self {
            position,
            kind,
            locked: false,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn x(&self) -> f32 {
        self.position.x()
    }

    pub fn y(&self) -> f32 {
        self.position.y()
    }

    pub fn kind(&self) -> PointKind {
        self.kind
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_kind(&mut self, kind: PointKind) {
        self.kind = kind;
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }
}

/// The semantic role of a shape.
///
/// Most outlines are [`ShapeKind::Simple`]; the template kinds come from
/// markup tags and only change how the outline is rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    #[default]
    Simple,
    Arrowhead,
    PointMarker,
    Document,
    Storage,
    Io,
    Decision,
    ManualOperation,
    Trapezoid,
    Ellipse,
}

impl ShapeKind {
    /// Whether the shape keeps its point list but is drawn from a template
    /// fitted to its bounds.
    pub fn is_template(self) -> bool {
        matches!(
            self,
            Self::Document
                | Self::Storage
                | Self::Io
                | Self::Decision
                | Self::ManualOperation
                | Self::Trapezoid
                | Self::Ellipse
        )
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Simple => "simple",
            Self::Arrowhead => "arrowhead",
            Self::PointMarker => "point marker",
            Self::Document => "document",
            Self::Storage => "storage",
            Self::Io => "input/output",
            Self::Decision => "decision",
            Self::ManualOperation => "manual operation",
            Self::Trapezoid => "trapezoid",
            Self::Ellipse => "ellipse",
        };
        f.write_str(name)
    }
}

/// A polygon or polyline recovered from the grid.
///
/// # Examples
///
/// ```
/// use scrawl_core::{geometry::Point, shape::{PointKind, Shape, ShapePoint}};
///
/// let mut square = Shape::new_closed();
/// for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)] {
///     square.push_point(ShapePoint::new(Point::new(x, y), PointKind::Normal));
/// }
/// assert_eq!(square.area(), 100.0);
/// assert!(square.contains(Point::new(5.0, 5.0)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    kind: ShapeKind,
    points: Vec<ShapePoint>,
    closed: bool,
    dashed: bool,
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
}

impl Shape {
    /// Creates an empty open polyline.
    pub fn new_open() -> Self {
        Self::default()
    }

    /// Creates an empty closed polygon.
    pub fn new_closed() -> Self {
        Self {
            closed: true,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn points(&self) -> &[ShapePoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [ShapePoint] {
        &mut self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_dashed(&self) -> bool {
        self.dashed
    }

    pub fn fill_color(&self) -> Option<Color> {
        self.fill_color
    }

    /// Explicit outline colour; renderers fall back to their default stroke.
    pub fn stroke_color(&self) -> Option<Color> {
        self.stroke_color
    }

    pub fn set_kind(&mut self, kind: ShapeKind) {
        self.kind = kind;
    }

    pub fn set_dashed(&mut self, dashed: bool) {
        self.dashed = dashed;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = Some(color);
    }

    /// Returns a copy with the given kind.
    pub fn with_kind(mut self, kind: ShapeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn push_point(&mut self, point: ShapePoint) {
        self.points.push(point);
    }

    /// Bounding box of the vertices, or `None` for a shape without points.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.points.iter().map(ShapePoint::position))
    }

    /// Unsigned polygon area by the shoelace formula.
    ///
    /// Open shapes and shapes with fewer than three points have no area.
    pub fn area(&self) -> f32 {
        if !self.closed || self.points.len() < 3 {
            return 0.0;
        }
        let twice: f32 = self
            .points
            .iter()
            .zip(self.points.iter().cycle().skip(1))
            .map(|(a, b)| a.x() * b.y() - b.x() * a.y())
            .sum();
        (twice / 2.0).abs()
    }

    /// The straight-segment outline through every vertex, closed when the
    /// shape is closed.
    pub fn outline(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            path.move_to(first.position().to_kurbo());
            for point in points {
                path.line_to(point.position().to_kurbo());
            }
            if self.closed {
                path.close_path();
            }
        }
        path
    }

    /// Whether `point` lies inside the polygon. Open shapes contain nothing.
    pub fn contains(&self, point: Point) -> bool {
        self.closed && self.points.len() >= 3 && self.outline().contains(point.to_kurbo())
    }

    /// Whether both shapes have the same vertex positions, ignoring order.
    pub fn has_same_points(&self, other: &Shape) -> bool {
        let covers = |a: &[ShapePoint], b: &[ShapePoint]| {
            a.iter()
                .all(|p| b.iter().any(|q| p.position() == q.position()))
        };
        self.points.len() == other.points.len()
            && covers(&self.points, &other.points)
            && covers(&other.points, &self.points)
    }

    /// Whether the shape casts a drop shadow when rendered.
    ///
    /// Only solid closed outlines do; arrowheads and point markers never do.
    pub fn drops_shadow(&self) -> bool {
        self.closed
            && !self.dashed
            && !matches!(self.kind, ShapeKind::Arrowhead | ShapeKind::PointMarker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(closed: bool, coords: &[(f32, f32)]) -> Shape {
        let mut shape = if closed {
            Shape::new_closed()
        } else {
            Shape::new_open()
        };
        for &(x, y) in coords {
            shape.push_point(ShapePoint::new(Point::new(x, y), PointKind::Normal));
        }
        shape
    }

    #[test]
    fn test_area_of_rectangle() {
        let shape = polygon(true, &[(0.0, 0.0), (40.0, 0.0), (40.0, 28.0), (0.0, 28.0)]);
        assert_eq!(shape.area(), 1120.0);
    }

    #[test]
    fn test_area_of_open_shape_is_zero() {
        let shape = polygon(false, &[(0.0, 0.0), (40.0, 0.0), (40.0, 28.0)]);
        assert_eq!(shape.area(), 0.0);
    }

    #[test]
    fn test_contains() {
        let shape = polygon(true, &[(0.0, 0.0), (40.0, 0.0), (40.0, 28.0), (0.0, 28.0)]);
        assert!(shape.contains(Point::new(20.0, 14.0)));
        assert!(!shape.contains(Point::new(41.0, 14.0)));

        let line = polygon(false, &[(0.0, 0.0), (40.0, 0.0), (40.0, 28.0)]);
        assert!(!line.contains(Point::new(30.0, 5.0)));
    }

    #[test]
    fn test_has_same_points_ignores_order() {
        let a = polygon(true, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let b = polygon(true, &[(10.0, 10.0), (0.0, 0.0), (10.0, 0.0)]);
        let c = polygon(true, &[(10.0, 10.0), (0.0, 0.0), (10.0, 5.0)]);

        assert!(a.has_same_points(&b));
        assert!(!a.has_same_points(&c));
    }

    #[test]
    fn test_locked_point() {
        let mut point = ShapePoint::new(Point::new(1.0, 2.0), PointKind::Round);
        assert!(!point.is_locked());
        point.lock();
        assert!(point.is_locked());
        assert_eq!(point.kind(), PointKind::Round);
    }

    #[test]
    fn test_drops_shadow() {
        let mut shape = polygon(true, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert!(shape.drops_shadow());

        shape.set_dashed(true);
        assert!(!shape.drops_shadow());

        let arrow = polygon(true, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])
            .with_kind(ShapeKind::Arrowhead);
        assert!(!arrow.drops_shadow());
    }

    #[test]
    fn test_bounds() {
        let shape = polygon(false, &[(5.0, 3.0), (15.0, 3.0), (15.0, 9.0)]);
        assert_eq!(shape.bounds(), Some(Bounds::new(5.0, 3.0, 15.0, 9.0)));
        assert_eq!(Shape::new_open().bounds(), None);
    }
}
