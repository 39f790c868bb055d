//! Pulling apart edges that two shapes draw on the same line.
//!
//! Boxes that share a wall come out of the trace with identical or
//! overlapping edges. Each such edge is moved a fifth of a cell into its
//! own shape so that both outlines stay visible.

use indexmap::IndexSet;
use log::debug;

use scrawl_core::{
    geometry::{CellMetrics, Point},
    shape::Shape,
};

/// Half-width of the probe used to find the inside of an edge.
const PROBE: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
    Sloped,
}

/// One edge of one shape, identified by the indices of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Edge {
    shape: usize,
    start: usize,
    end: usize,
    from: Point,
    to: Point,
}

impl Edge {
    fn key(&self) -> (usize, usize, usize) {
        (self.shape, self.start, self.end)
    }

    fn axis(&self) -> Axis {
        axis_of(self.from, self.to)
    }

    fn is_same_segment(&self, other: &Edge) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }

    /// Coordinate of the line the edge lies on.
    fn offset_from_origin(&self) -> f32 {
        match self.axis() {
            Axis::Horizontal => self.from.y(),
            _ => self.from.x(),
        }
    }

    /// Extent along the edge's own axis, lowest first.
    fn span(&self) -> (f32, f32) {
        let (a, b) = match self.axis() {
            Axis::Horizontal => (self.from.x(), self.to.x()),
            _ => (self.from.y(), self.to.y()),
        };
        (a.min(b), a.max(b))
    }

    /// Whether two axis-parallel edges overlap on the same line.
    ///
    /// Edges that only meet end to end do not count. Sloped edges never
    /// touch anything, not even an identical sloped edge, since there is no
    /// axis to move them along.
    fn touches(&self, other: &Edge) -> bool {
        let axis = self.axis();
        if axis == Axis::Sloped || other.axis() == Axis::Sloped {
            return false;
        }
        if self.is_same_segment(other) {
            return true;
        }
        if axis != other.axis() || self.offset_from_origin() != other.offset_from_origin() {
            return false;
        }

        let (first, second) = if self.span().0 <= other.span().0 {
            (self.span(), other.span())
        } else {
            (other.span(), self.span())
        };
        if first.1 == second.0 {
            return false;
        }
        let within = |(lo, hi): (f32, f32), value: f32| lo <= value && value <= hi;
        let (mine, theirs) = (self.span(), other.span());
        within(theirs, mine.0) || within(theirs, mine.1) || within(mine, theirs.0) || within(mine, theirs.1)
    }
}

fn axis_of(from: Point, to: Point) -> Axis {
    if from.y() == to.y() {
        Axis::Horizontal
    } else if from.x() == to.x() {
        Axis::Vertical
    } else {
        Axis::Sloped
    }
}

fn edges_of(shapes: &[Shape]) -> Vec<Edge> {
    let mut edges = Vec::new();
    for (index, shape) in shapes.iter().enumerate() {
        let points = shape.points();
        let count = points.len();
        if count < 2 {
            continue;
        }
        let mut pairs: Vec<(usize, usize)> = (0..count - 1).map(|i| (i, i + 1)).collect();
        if shape.is_closed() {
            pairs.push((count - 1, 0));
        }
        edges.extend(pairs.into_iter().map(|(start, end)| Edge {
            shape: index,
            start,
            end,
            from: points[start].position(),
            to: points[end].position(),
        }));
    }
    edges
}

/// Moves every edge that overlaps an edge of another outline a fifth of
/// the smaller cell dimension towards the inside of its own shape.
///
/// Returns the number of edges moved.
pub fn separate_common_edges(shapes: &mut [Shape], metrics: CellMetrics) -> usize {
    let offset = metrics.min_dimension() / 5.0;
    let edges = edges_of(shapes);

    let mut moved: IndexSet<(usize, usize, usize)> = IndexSet::new();
    for (i, first) in edges.iter().enumerate() {
        for second in &edges[i + 1..] {
            if !first.touches(second) {
                continue;
            }
            for edge in [first, second] {
                if moved.insert(edge.key()) {
                    move_inwards(&mut shapes[edge.shape], edge.start, edge.end, offset);
                }
            }
        }
    }

    debug!(edges = moved.len(); "Separated common edges");
    moved.len()
}

/// Shifts the edge `start`..`end` of `shape` by `offset` to whichever side
/// lies inside the shape's current outline.
fn move_inwards(shape: &mut Shape, start: usize, end: usize, offset: f32) {
    let (from, to) = {
        let points = shape.points();
        (points[start].position(), points[end].position())
    };
    let middle = from.midpoint(to);

    let shift = match axis_of(from, to) {
        Axis::Horizontal => {
            if shape.contains(middle.with_y(middle.y() - PROBE)) {
                Point::new(0.0, -offset)
            } else if shape.contains(middle.with_y(middle.y() + PROBE)) {
                Point::new(0.0, offset)
            } else {
                return;
            }
        }
        Axis::Vertical => {
            if shape.contains(middle.with_x(middle.x() - PROBE)) {
                Point::new(-offset, 0.0)
            } else if shape.contains(middle.with_x(middle.x() + PROBE)) {
                Point::new(offset, 0.0)
            } else {
                return;
            }
        }
        Axis::Sloped => return,
    };

    let points = shape.points_mut();
    for index in [start, end] {
        let position = points[index].position();
        points[index].set_position(position.add_point(shift));
    }
}

#[cfg(test)]
mod tests {
    use scrawl_core::shape::{PointKind, ShapePoint};

    use super::*;

    fn closed(points: &[(f32, f32)]) -> Shape {
        let mut shape = Shape::new_closed();
        for &(x, y) in points {
            shape.push_point(ShapePoint::new(Point::new(x, y), PointKind::Normal));
        }
        shape
    }

    fn positions(shape: &Shape) -> Vec<(f32, f32)> {
        shape.points().iter().map(|p| (p.x(), p.y())).collect()
    }

    fn edge(from: (f32, f32), to: (f32, f32)) -> Edge {
        Edge {
            shape: 0,
            start: 0,
            end: 1,
            from: Point::new(from.0, from.1),
            to: Point::new(to.0, to.1),
        }
    }

    #[test]
    fn test_touching_edges() {
        let wall = edge((65.0, 35.0), (65.0, 63.0));
        assert!(wall.touches(&edge((65.0, 63.0), (65.0, 35.0))));
        assert!(wall.touches(&edge((65.0, 49.0), (65.0, 91.0))));
        assert!(wall.touches(&edge((65.0, 21.0), (65.0, 91.0))));

        assert!(!wall.touches(&edge((65.0, 63.0), (65.0, 91.0))));
        assert!(!wall.touches(&edge((67.0, 35.0), (67.0, 63.0))));
        assert!(!wall.touches(&edge((25.0, 35.0), (65.0, 35.0))));
        assert!(!wall.touches(&edge((25.0, 35.0), (65.0, 63.0))));
    }

    #[test]
    fn test_shared_wall_is_split() {
        let mut shapes = vec![
            closed(&[(25.0, 35.0), (65.0, 35.0), (65.0, 63.0), (25.0, 63.0)]),
            closed(&[(65.0, 35.0), (105.0, 35.0), (105.0, 63.0), (65.0, 63.0)]),
        ];
        let moved = separate_common_edges(&mut shapes, CellMetrics::default());

        assert_eq!(moved, 2);
        assert_eq!(
            positions(&shapes[0]),
            vec![(25.0, 35.0), (63.0, 35.0), (63.0, 63.0), (25.0, 63.0)]
        );
        assert_eq!(
            positions(&shapes[1]),
            vec![(67.0, 35.0), (105.0, 35.0), (105.0, 63.0), (67.0, 63.0)]
        );
    }

    #[test]
    fn test_apart_shapes_are_untouched() {
        let left = closed(&[(25.0, 35.0), (55.0, 35.0), (55.0, 63.0), (25.0, 63.0)]);
        let right = closed(&[(75.0, 35.0), (105.0, 35.0), (105.0, 63.0), (75.0, 63.0)]);
        let mut shapes = vec![left.clone(), right.clone()];

        assert_eq!(separate_common_edges(&mut shapes, CellMetrics::default()), 0);
        assert_eq!(shapes, vec![left, right]);
    }

    #[test]
    fn test_stacked_boxes_split_floor() {
        let mut shapes = vec![
            closed(&[(25.0, 35.0), (65.0, 35.0), (65.0, 63.0), (25.0, 63.0)]),
            closed(&[(25.0, 63.0), (65.0, 63.0), (65.0, 91.0), (25.0, 91.0)]),
        ];
        separate_common_edges(&mut shapes, CellMetrics::default());

        assert_eq!(
            positions(&shapes[0]),
            vec![(25.0, 35.0), (65.0, 35.0), (65.0, 61.0), (25.0, 61.0)]
        );
        assert_eq!(
            positions(&shapes[1]),
            vec![(25.0, 65.0), (65.0, 65.0), (65.0, 91.0), (25.0, 91.0)]
        );
    }

    #[test]
    fn test_wall_shared_with_two_boxes_moves_once() {
        let mut shapes = vec![
            closed(&[(25.0, 35.0), (65.0, 35.0), (65.0, 91.0), (25.0, 91.0)]),
            closed(&[(65.0, 35.0), (105.0, 35.0), (105.0, 63.0), (65.0, 63.0)]),
            closed(&[(65.0, 63.0), (105.0, 63.0), (105.0, 91.0), (65.0, 91.0)]),
        ];
        let moved = separate_common_edges(&mut shapes, CellMetrics::default());

        assert_eq!(moved, 5);
        assert_eq!(
            positions(&shapes[0]),
            vec![(25.0, 35.0), (63.0, 35.0), (63.0, 91.0), (25.0, 91.0)]
        );
        assert_eq!(
            positions(&shapes[1]),
            vec![(67.0, 35.0), (105.0, 35.0), (105.0, 61.0), (67.0, 61.0)]
        );
        assert_eq!(
            positions(&shapes[2]),
            vec![(67.0, 65.0), (105.0, 65.0), (105.0, 91.0), (67.0, 91.0)]
        );
    }

    #[test]
    fn test_sloped_edges_never_touch() {
        let slope = edge((25.0, 35.0), (65.0, 63.0));
        assert!(!slope.touches(&slope));
        assert!(!slope.touches(&edge((65.0, 63.0), (25.0, 35.0))));
    }
}
