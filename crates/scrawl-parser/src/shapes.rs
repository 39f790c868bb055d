//! Turning boundary sets into vector shapes.
//!
//! Closed sets are walked once around the ring, with a vertex at every
//! corner. Open sets are grown from a line end; every junction starts a new
//! polyline per branch. Open polylines are then fixed up at their ends:
//! an end that stops one cell short of an arrowhead or junction is snapped
//! onto it and locked, and a free end is pushed out to the edge of its
//! cell.

use std::collections::VecDeque;

use log::trace;

use scrawl_core::{
    cell::Cell,
    color::Color,
    geometry::{CellMetrics, Point},
    shape::{PointKind, Shape, ShapeKind, ShapePoint},
};

use crate::{
    cellset::{CellSet, Topology},
    error::GeometryError,
    grid::TextGrid,
};

/// Builds shapes for one grid geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeFactory {
    metrics: CellMetrics,
    all_corners_round: bool,
}

impl ShapeFactory {
    pub fn new(metrics: CellMetrics) -> Self {
        Self {
            metrics,
            all_corners_round: false,
        }
    }

    /// Render every corner as a round corner.
    pub fn with_all_corners_round(mut self, all_corners_round: bool) -> Self {
        self.all_corners_round = all_corners_round;
        self
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    fn cell_point(&self, cell: Cell, kind: PointKind) -> ShapePoint {
        ShapePoint::new(self.metrics.cell_center(cell), kind)
    }

    /// A vertex at the centre of `cell`, round or sharp as its glyph says.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnclassifiablePoint`] when the cell is
    /// neither a corner, a line end nor a junction.
    pub fn point_for_cell(&self, grid: &TextGrid, cell: Cell) -> Result<ShapePoint, GeometryError> {
        let kind = if grid.is_corner(cell) && self.all_corners_round {
            PointKind::Round
        } else if grid.is_normal_corner(cell) {
            PointKind::Normal
        } else if grid.is_round_corner(cell) {
            PointKind::Round
        } else if grid.is_lines_end(cell) || grid.is_intersection(cell) {
            PointKind::Normal
        } else {
            return Err(GeometryError::UnclassifiablePoint {
                cell,
                glyph: grid.get(cell).unwrap_or(' '),
            });
        };
        Ok(self.cell_point(cell, kind))
    }

    /// Walks a closed boundary and emits its polygon.
    ///
    /// Sets of fewer than two cells produce no shape.
    ///
    /// # Errors
    ///
    /// Fails when the set is open, when the walk forks or dead-ends, or
    /// when it does not return to its start.
    pub fn closed_shape(&self, work: &TextGrid, set: &CellSet) -> Result<Option<Shape>, GeometryError> {
        let Some(start) = set.first() else {
            return Ok(None);
        };
        let topology = set.topology(work)?;
        if topology == Topology::Open {
            return Err(GeometryError::TopologyMismatch {
                cell: start,
                expected: Topology::Closed,
                found: topology,
            });
        }
        if set.len() < 2 {
            return Ok(None);
        }

        let mut shape = Shape::new_closed();
        shape.set_dashed(set.iter().any(|cell| work.contains_dashed_glyph(cell)));

        let isolated = work.isolate(set);
        if isolated.is_corner(start) {
            shape.push_point(self.point_for_cell(&isolated, start)?);
        }
        let mut previous = start;
        let Some(mut cell) = isolated.follow_cell(start, None)?.first() else {
            return Err(GeometryError::DeadEnd { cell: start });
        };
        if isolated.is_corner(cell) {
            shape.push_point(self.point_for_cell(&isolated, cell)?);
        }

        for _ in 0..set.len() {
            let next = isolated.follow_cell(cell, Some(previous))?;
            let following = match next.len() {
                0 => return Err(GeometryError::DeadEnd { cell }),
                1 => next.first().unwrap_or(start),
                _ => return Err(GeometryError::RingBranch { cell }),
            };
            previous = cell;
            cell = following;
            if cell == start {
                trace!(points = shape.points().len(); "Closed shape traced");
                return Ok(Some(shape));
            }
            if isolated.is_corner(cell) {
                shape.push_point(self.point_for_cell(&isolated, cell)?);
            }
        }
        Err(GeometryError::RingNotClosed { cell: start })
    }

    /// Grows the polylines of an open boundary.
    ///
    /// A one-cell set becomes a short line across its cell unless it is a
    /// dashed glyph. Longer sets are grown from their first line end; ends
    /// are then snapped onto anchors and pushed to cell edges.
    ///
    /// # Errors
    ///
    /// Fails when the set is not open or a vertex cannot be placed.
    pub fn open_shapes(&self, work: &TextGrid, set: &CellSet) -> Result<Vec<Shape>, GeometryError> {
        let Some(first) = set.first() else {
            return Ok(Vec::new());
        };
        let topology = set.topology(work)?;
        if topology != Topology::Open {
            return Err(GeometryError::TopologyMismatch {
                cell: first,
                expected: Topology::Open,
                found: topology,
            });
        }

        if set.len() == 1 {
            if work.contains_dashed_glyph(first) {
                return Ok(Vec::new());
            }
            let mut shapes: Vec<Shape> = self.small_line(work, first).into_iter().collect();
            for shape in &mut shapes {
                self.connect_ends_to_anchors(shape, work);
            }
            return Ok(shapes);
        }

        let mut shapes = self.grow_edges(&work.isolate(set), set)?;
        if shapes.iter().any(Shape::is_dashed) {
            for shape in &mut shapes {
                shape.set_dashed(true);
            }
        }
        for shape in &mut shapes {
            self.connect_ends_to_anchors(shape, work);
            self.move_ends_to_cell_edges(shape, work);
        }
        Ok(shapes)
    }

    /// Follows the set from its first line end, starting a new polyline at
    /// every junction for each branch not yet visited.
    fn grow_edges(&self, isolated: &TextGrid, set: &CellSet) -> Result<Vec<Shape>, GeometryError> {
        let Some(start) = set.iter().find(|&cell| isolated.is_lines_end(cell)) else {
            return Ok(Vec::new());
        };
        let Some(first_step) = isolated.follow_cell(start, None)?.first() else {
            return Ok(Vec::new());
        };

        let mut shapes = Vec::new();
        let mut visited = CellSet::new();
        let mut queue = VecDeque::from([(start, first_step)]);

        while let Some((origin, mut cell)) = queue.pop_front() {
            visited.add(origin);
            let mut shape = Shape::new_open();
            shape.push_point(self.point_for_cell(isolated, origin)?);
            shape.set_dashed(isolated.contains_dashed_glyph(origin));

            let mut previous = origin;
            for _ in 0..set.len() {
                visited.add(cell);
                if isolated.is_point_cell(cell) {
                    shape.push_point(self.point_for_cell(isolated, cell)?);
                }
                if isolated.contains_dashed_glyph(cell) {
                    shape.set_dashed(true);
                }
                if isolated.is_lines_end(cell) {
                    break;
                }
                let next = isolated.follow_cell(cell, Some(previous))?;
                if next.len() == 1 {
                    previous = cell;
                    cell = next.first().unwrap_or(cell);
                    continue;
                }
                queue.extend(
                    next.iter()
                        .filter(|branch| !visited.contains(*branch))
                        .map(|branch| (cell, branch)),
                );
                break;
            }

            if shape.points().len() >= 2 {
                shapes.push(shape);
            }
        }
        trace!(shapes = shapes.len(); "Grew open shapes");
        Ok(shapes)
    }

    /// A line spanning a single horizontal or vertical line cell.
    pub fn small_line(&self, work: &TextGrid, cell: Cell) -> Option<Shape> {
        let m = self.metrics;
        let (from, to) = if work.is_horizontal_line(cell) {
            (
                Point::new(m.cell_min_x(cell), m.cell_mid_y(cell)),
                Point::new(m.cell_max_x(cell) - 1.0, m.cell_mid_y(cell)),
            )
        } else if work.is_vertical_line(cell) {
            (
                Point::new(m.cell_mid_x(cell), m.cell_min_y(cell)),
                Point::new(m.cell_mid_x(cell), m.cell_max_y(cell) - 1.0),
            )
        } else {
            return None;
        };
        let mut shape = Shape::new_open();
        shape.push_point(ShapePoint::new(from, PointKind::Normal));
        shape.push_point(ShapePoint::new(to, PointKind::Normal));
        Some(shape)
    }

    /// Snaps each end of an open polyline onto the arrowhead, corner or
    /// junction one cell beyond it, and locks it there.
    pub fn connect_ends_to_anchors(&self, shape: &mut Shape, work: &TextGrid) {
        let count = shape.points().len();
        if shape.is_closed() || count < 2 {
            return;
        }
        for (end, neighbour) in [(0, 1), (count - 1, count - 2)] {
            let points = shape.points_mut();
            let (position, next) = (points[end].position(), points[neighbour].position());
            let Some(beyond) = self.one_cell_beyond(position, next) else {
                continue;
            };
            let anchor = self.metrics.cell_for(beyond);
            if work.is_arrowhead(anchor) || work.is_corner(anchor) || work.is_intersection(anchor) {
                points[end].set_position(self.metrics.cell_center(anchor));
                points[end].lock();
            }
        }
    }

    /// The point one cell past `end`, continuing away from `next`.
    fn one_cell_beyond(&self, end: Point, next: Point) -> Option<Point> {
        let (width, height) = (self.metrics.cell_width(), self.metrics.cell_height());
        if next.is_north_of(end) {
            Some(end.with_y(end.y() + height))
        } else if next.is_south_of(end) {
            Some(end.with_y(end.y() - height))
        } else if next.is_west_of(end) {
            Some(end.with_x(end.x() + width))
        } else if next.is_east_of(end) {
            Some(end.with_x(end.x() - width))
        } else {
            None
        }
    }

    /// Moves each unlocked end sitting on a line end to the edge of its
    /// cell facing away from the rest of the polyline.
    pub fn move_ends_to_cell_edges(&self, shape: &mut Shape, work: &TextGrid) {
        let count = shape.points().len();
        if shape.is_closed() || count < 2 {
            return;
        }
        let m = self.metrics;
        for (end, neighbour) in [(0, 1), (count - 1, count - 2)] {
            let points = shape.points_mut();
            if points[end].is_locked() {
                continue;
            }
            let (position, next) = (points[end].position(), points[neighbour].position());
            let cell = m.cell_for(position);
            if !work.is_lines_end(cell) {
                continue;
            }
            let moved = if next.is_east_of(position) {
                position.with_x(m.cell_min_x(cell))
            } else if next.is_west_of(position) {
                position.with_x(m.cell_max_x(cell))
            } else if next.is_south_of(position) {
                position.with_y(m.cell_min_y(cell))
            } else if next.is_north_of(position) {
                position.with_y(m.cell_max_y(cell))
            } else {
                continue;
            };
            points[end].set_position(moved);
        }
    }

    /// A filled triangle pointing the way the arrowhead glyph does.
    pub fn arrowhead(&self, work: &TextGrid, cell: Cell) -> Option<Shape> {
        let m = self.metrics;
        let (min_x, mid_x, max_x) = (m.cell_min_x(cell), m.cell_mid_x(cell), m.cell_max_x(cell));
        let (min_y, mid_y, max_y) = (m.cell_min_y(cell), m.cell_mid_y(cell), m.cell_max_y(cell));

        let corners = if work.is_north_arrowhead(cell) {
            [(mid_x, min_y), (min_x, max_y), (max_x, max_y)]
        } else if work.is_south_arrowhead(cell) {
            [(min_x, min_y), (mid_x, max_y), (max_x, min_y)]
        } else if work.is_east_arrowhead(cell) {
            [(min_x, min_y), (max_x, mid_y), (min_x, max_y)]
        } else if work.is_west_arrowhead(cell) {
            [(max_x, min_y), (min_x, mid_y), (max_x, max_y)]
        } else {
            return None;
        };

        let mut shape = Shape::new_closed().with_kind(ShapeKind::Arrowhead);
        for (x, y) in corners {
            shape.push_point(ShapePoint::new(Point::new(x, y), PointKind::Normal));
        }
        shape.set_fill_color(Color::black());
        Some(shape)
    }

    /// One arrowhead per arrowhead cell of the work grid.
    pub fn arrowheads(&self, work: &TextGrid) -> Vec<Shape> {
        work.arrowhead_cells()
            .iter()
            .filter_map(|cell| self.arrowhead(work, cell))
            .collect()
    }

    /// One white marker per `*` sitting on a line of the original grid.
    pub fn point_markers(&self, grid: &TextGrid) -> Vec<Shape> {
        grid.point_markers_on_line()
            .iter()
            .map(|cell| {
                let mut marker = Shape::new_open().with_kind(ShapeKind::PointMarker);
                marker.push_point(self.cell_point(cell, PointKind::Normal));
                marker.set_fill_color(Color::white());
                marker
            })
            .collect()
    }
}

/// Keeps the first of every group of shapes with the same vertices.
pub fn remove_duplicate_shapes(shapes: Vec<Shape>) -> Vec<Shape> {
    let mut unique: Vec<Shape> = Vec::with_capacity(shapes.len());
    for shape in shapes {
        if !unique.iter().any(|kept| kept.has_same_points(&shape)) {
            unique.push(shape);
        }
    }
    unique
}
