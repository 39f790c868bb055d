//! SVG rendering of reconstructed diagrams.
//!
//! Drawing order, bottom to top:
//!
//! 1. background rectangle
//! 2. blurred drop shadows of solid closed shapes (optional)
//! 3. shapes, largest area first so that nested boxes stay visible
//! 4. point markers
//! 5. text labels

use std::io::Write;

use kurbo::{BezPath, Ellipse, Rect, Shape as _};
use log::{debug, trace};
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use scrawl_core::{
    apply_stroke,
    color::Color,
    diagram::{Diagram, Label, TextAlign},
    geometry::{Bounds, CellMetrics, Point, Size},
    shape::{PointKind, Shape, ShapeKind},
    stroke::{StrokeDefinition, StrokeStyle},
};

use super::{Error, Exporter};

const SHADOW_FILTER_ID: &str = "shadow-blur";
const SHADOW_BLUR: f32 = 2.0;
/// Shadow offset as a divisor of the smaller cell dimension.
const SHADOW_OFFSET_DIVISOR: f32 = 3.3333;
const FONT_FAMILY: &str = "monospace";
/// Point marker diameter relative to the smaller cell dimension.
const MARKER_DIAMETER: f32 = 0.7;
const ELLIPSE_TOLERANCE: f64 = 0.1;

/// Builder for the SVG backend.
///
/// # Examples
///
/// ```
/// use scrawl::export::svg::SvgBuilder;
///
/// let svg = SvgBuilder::new().with_shadows(false).build().unwrap();
/// assert!(SvgBuilder::new().with_stroke_width(0.0).build().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SvgBuilder {
    background: Option<Color>,
    shadows: bool,
    stroke_width: f32,
}

impl Default for SvgBuilder {
    fn default() -> Self {
        Self {
            background: None,
            shadows: true,
            stroke_width: 1.0,
        }
    }
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Background colour; white when unset.
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }

    pub fn with_stroke_width(mut self, stroke_width: f32) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    /// Finishes the builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] when the stroke width is not a positive
    /// finite number.
    pub fn build(self) -> Result<Svg, Error> {
        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            return Err(Error::Render(format!(
                "stroke width must be positive, got {}",
                self.stroke_width
            )));
        }
        Ok(Svg {
            background: self.background.unwrap_or_else(Color::white),
            shadows: self.shadows,
            stroke_width: self.stroke_width,
        })
    }
}

/// The SVG backend.
#[derive(Debug, Clone)]
pub struct Svg {
    background: Color,
    shadows: bool,
    stroke_width: f32,
}

impl Svg {
    /// Renders `diagram` into an SVG document sized to its character grid.
    pub fn render_diagram(&self, diagram: &Diagram) -> Document {
        let size = diagram.size();
        let metrics = diagram.metrics();

        let doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height());
        let mut doc = self.add_background(doc, size);

        let mut shapes: Vec<&Shape> = diagram
            .shapes()
            .iter()
            .filter(|shape| !shape.points().is_empty())
            .collect();
        shapes.sort_by(|a, b| b.area().total_cmp(&a.area()));

        if self.shadows {
            if let Some(shadows) = self.render_shadows(&shapes, metrics) {
                doc = doc.add(shadow_definitions()).add(shadows);
            }
        }

        let mut body = svg_element::Group::new();
        for shape in shapes
            .iter()
            .filter(|shape| shape.kind() != ShapeKind::PointMarker)
        {
            if let Some(path) = self.render_shape(shape, metrics) {
                body = body.add(path);
            }
        }
        for shape in shapes
            .iter()
            .filter(|shape| shape.kind() == ShapeKind::PointMarker)
        {
            body = body.add(self.render_point_marker(shape, metrics));
        }
        for label in diagram.labels() {
            body = body.add(render_label(label, metrics));
        }

        trace!(shapes = shapes.len(), labels = diagram.labels().len(); "Rendered diagram body");
        doc.add(body)
    }

    fn add_background(&self, doc: Document, size: Size) -> Document {
        let background = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", self.background.to_string())
            .set("fill-opacity", self.background.alpha());
        doc.add(background)
    }

    fn render_shadows(&self, shapes: &[&Shape], metrics: CellMetrics) -> Option<svg_element::Group> {
        let offset = metrics.min_dimension() / SHADOW_OFFSET_DIVISOR;
        let color = Color::from_rgb8(150, 150, 150);
        let mut group = svg_element::Group::new()
            .set("transform", format!("translate({offset}, {offset})"))
            .set("filter", format!("url(#{SHADOW_FILTER_ID})"))
            .set("fill", color.to_string());

        let mut count = 0;
        for shape in shapes.iter().filter(|shape| shape.drops_shadow()) {
            if let Some(path) = shape_path(shape, metrics) {
                group = group.add(svg_element::Path::new().set("d", path.to_svg()));
                count += 1;
            }
        }
        (count > 0).then_some(group)
    }

    fn render_shape(&self, shape: &Shape, metrics: CellMetrics) -> Option<svg_element::Path> {
        let path = shape_path(shape, metrics)?;
        let stroke_color = shape.stroke_color().unwrap_or_default();
        let element = svg_element::Path::new().set("d", path.to_svg());

        if shape.kind() == ShapeKind::Arrowhead {
            return Some(
                element
                    .set("fill", stroke_color.to_string())
                    .set("fill-opacity", stroke_color.alpha())
                    .set("stroke", "none"),
            );
        }

        let element = if shape.is_closed() && !shape.is_dashed() {
            let fill = shape.fill_color().unwrap_or_else(Color::white);
            element
                .set("fill", fill.to_string())
                .set("fill-opacity", fill.alpha())
        } else {
            element.set("fill", "none")
        };

        let style = if shape.is_dashed() {
            StrokeStyle::Dashed
        } else {
            StrokeStyle::Solid
        };
        let stroke = StrokeDefinition::new(stroke_color, self.stroke_width).with_style(style);
        Some(apply_stroke!(element, &stroke).set("stroke-linejoin", "round"))
    }

    /// A dot in the stroke colour with a white centre.
    fn render_point_marker(&self, shape: &Shape, metrics: CellMetrics) -> svg_element::Group {
        let color = shape.stroke_color().unwrap_or_default();
        let center = shape.points()[0].position();
        let diameter = MARKER_DIAMETER * metrics.min_dimension();

        let outer = svg_element::Circle::new()
            .set("cx", center.x())
            .set("cy", center.y())
            .set("r", (diameter + self.stroke_width) / 2.0)
            .set("fill", color.to_string());
        let inner = svg_element::Circle::new()
            .set("cx", center.x())
            .set("cy", center.y())
            .set("r", (diameter - self.stroke_width).max(0.0) / 2.0)
            .set("fill", shape.fill_color().unwrap_or_else(Color::white).to_string());
        svg_element::Group::new().add(outer).add(inner)
    }
}

impl Exporter for Svg {
    fn export_diagram(&mut self, diagram: &Diagram, writer: &mut dyn Write) -> Result<(), Error> {
        let document = self.render_diagram(diagram);
        svg::write(writer, &document)?;
        debug!(
            shapes = diagram.shapes().len(),
            labels = diagram.labels().len();
            "SVG document written"
        );
        Ok(())
    }
}

fn shadow_definitions() -> svg_element::Definitions {
    let blur = svg_element::FilterEffectGaussianBlur::new().set("stdDeviation", SHADOW_BLUR);
    let filter = svg_element::Filter::new()
        .set("id", SHADOW_FILTER_ID)
        .set("x", "-10%")
        .set("y", "-10%")
        .set("width", "120%")
        .set("height", "120%")
        .add(blur);
    svg_element::Definitions::new().add(filter)
}

fn render_label(label: &Label, metrics: CellMetrics) -> svg_element::Text {
    let bounds = label.bounds();
    let (x, anchor) = match label.align() {
        TextAlign::Start => (bounds.min_x(), "start"),
        TextAlign::Middle => (bounds.center().x(), "middle"),
        TextAlign::End => (bounds.max_x(), "end"),
    };
    let color = label.color();

    svg_element::Text::new("")
        .set("x", x)
        .set("y", bounds.center().y())
        .set("text-anchor", anchor)
        .set("dominant-baseline", "central")
        .set("font-family", FONT_FAMILY)
        .set("font-size", metrics.cell_height())
        .set("fill", color.to_string())
        .set("fill-opacity", color.alpha())
        .add(SvgText::new(label.text()))
}

fn to_kurbo(x: f32, y: f32) -> kurbo::Point {
    kurbo::Point::new(f64::from(x), f64::from(y))
}

/// The outline drawn for `shape`, or `None` when it has nothing to draw.
///
/// Four-point shapes of a template kind are drawn as their template inside
/// the bounding box; everything else follows its vertices.
pub fn shape_path(shape: &Shape, metrics: CellMetrics) -> Option<BezPath> {
    if shape.kind() == ShapeKind::PointMarker {
        return None;
    }
    let bounds = shape.bounds()?;
    if shape.points().len() != 4 || !shape.kind().is_template() {
        return outline_path(shape, metrics);
    }
    let template = match shape.kind() {
        ShapeKind::Document => document_path(bounds),
        ShapeKind::Storage => storage_path(bounds, metrics),
        ShapeKind::Io => io_path(bounds, metrics),
        ShapeKind::Decision => decision_path(bounds),
        ShapeKind::ManualOperation => trapezoid_path(bounds, metrics, true),
        ShapeKind::Trapezoid => trapezoid_path(bounds, metrics, false),
        ShapeKind::Ellipse => ellipse_path(bounds),
        ShapeKind::Simple | ShapeKind::Arrowhead | ShapeKind::PointMarker => {
            return outline_path(shape, metrics);
        }
    };
    Some(template)
}

/// Where the outline leaves the cell of `corner` heading for `other`.
fn cell_edge_point_between(corner: Point, other: Point, metrics: CellMetrics) -> Point {
    let cell = metrics.cell_for(corner);
    if other.is_north_of(corner) {
        corner.with_y(metrics.cell_min_y(cell))
    } else if other.is_south_of(corner) {
        corner.with_y(metrics.cell_max_y(cell))
    } else if other.is_west_of(corner) {
        corner.with_x(metrics.cell_min_x(cell))
    } else if other.is_east_of(corner) {
        corner.with_x(metrics.cell_max_x(cell))
    } else {
        corner
    }
}

/// Straight segments between vertices. A round vertex is cut at its cell's
/// edges and joined by a quadratic curve through the vertex.
fn outline_path(shape: &Shape, metrics: CellMetrics) -> Option<BezPath> {
    let points = shape.points();
    let count = points.len();
    if count < 2 {
        return None;
    }

    let mut path = BezPath::new();
    let mut first_entry = None;
    for (index, point) in points.iter().enumerate() {
        let position = point.position();
        let interior = shape.is_closed() || (index > 0 && index + 1 < count);
        let target = if point.kind() == PointKind::Round && interior {
            let prev = points[(index + count - 1) % count].position();
            let next = points[(index + 1) % count].position();
            let entry = cell_edge_point_between(position, prev, metrics);
            let exit = cell_edge_point_between(position, next, metrics);
            Some((entry, exit))
        } else {
            None
        };

        let start = target.map_or(position, |(entry, _)| entry);
        if index == 0 {
            path.move_to(to_kurbo(start.x(), start.y()));
            first_entry = Some(start);
        } else {
            path.line_to(to_kurbo(start.x(), start.y()));
        }
        if let Some((_, exit)) = target {
            path.quad_to(
                to_kurbo(position.x(), position.y()),
                to_kurbo(exit.x(), exit.y()),
            );
        }
    }

    if let Some(entry) = first_entry.filter(|_| shape.is_closed() && count > 2) {
        path.line_to(to_kurbo(entry.x(), entry.y()));
        path.close_path();
    }
    Some(path)
}

/// Rectangle with a wavy bottom edge.
fn document_path(bounds: Bounds) -> BezPath {
    let (min_x, min_y, max_x, max_y) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
    let mid_x = bounds.center().x();
    let control_dx = bounds.width() / 6.0;
    let control_dy = bounds.height() / 8.0;

    let mut path = BezPath::new();
    path.move_to(to_kurbo(min_x, min_y));
    path.line_to(to_kurbo(max_x, min_y));
    path.line_to(to_kurbo(max_x, max_y));
    path.quad_to(
        to_kurbo(mid_x + control_dx, max_y - control_dy),
        to_kurbo(mid_x, max_y),
    );
    path.quad_to(
        to_kurbo(mid_x - control_dx, max_y + control_dy),
        to_kurbo(min_x, max_y),
    );
    path.close_path();
    path
}

/// Cylinder: a full ellipse on top, sides, and the lower half of an
/// ellipse at the bottom.
fn storage_path(bounds: Bounds, metrics: CellMetrics) -> BezPath {
    let (min_x, min_y, max_x, max_y) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
    let offset_x = bounds.width() / 6.0;
    let offset_top = metrics.cell_height() / 2.0;
    let offset_bottom = metrics.cell_height() * 10.0 / 14.0;

    let mut path = BezPath::new();
    path.move_to(to_kurbo(min_x, min_y));
    path.curve_to(
        to_kurbo(min_x + offset_x, min_y + offset_top),
        to_kurbo(max_x - offset_x, min_y + offset_top),
        to_kurbo(max_x, min_y),
    );
    path.curve_to(
        to_kurbo(max_x - offset_x, min_y - offset_top),
        to_kurbo(min_x + offset_x, min_y - offset_top),
        to_kurbo(min_x, min_y),
    );
    path.line_to(to_kurbo(min_x, max_y));
    path.curve_to(
        to_kurbo(min_x + offset_x, max_y + offset_bottom),
        to_kurbo(max_x - offset_x, max_y + offset_bottom),
        to_kurbo(max_x, max_y),
    );
    path.line_to(to_kurbo(max_x, min_y));
    path
}

/// Parallelogram leaning right by half a cell.
fn io_path(bounds: Bounds, metrics: CellMetrics) -> BezPath {
    let offset = metrics.cell_width() / 2.0;
    let (min_x, min_y, max_x, max_y) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());

    let mut path = BezPath::new();
    path.move_to(to_kurbo(min_x + offset, min_y));
    path.line_to(to_kurbo(max_x + offset, min_y));
    path.line_to(to_kurbo(max_x - offset, max_y));
    path.line_to(to_kurbo(min_x - offset, max_y));
    path.close_path();
    path
}

/// Trapezoid narrowing upwards, or downwards when `inverted`.
fn trapezoid_path(bounds: Bounds, metrics: CellMetrics, inverted: bool) -> BezPath {
    let offset = if inverted {
        -metrics.cell_width() / 2.0
    } else {
        metrics.cell_width() / 2.0
    };
    let (min_x, min_y, max_x, max_y) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());

    let mut path = BezPath::new();
    path.move_to(to_kurbo(min_x + offset, min_y));
    path.line_to(to_kurbo(max_x - offset, min_y));
    path.line_to(to_kurbo(max_x + offset, max_y));
    path.line_to(to_kurbo(min_x - offset, max_y));
    path.close_path();
    path
}

/// Diamond touching the middle of each side.
fn decision_path(bounds: Bounds) -> BezPath {
    let center = bounds.center();

    let mut path = BezPath::new();
    path.move_to(to_kurbo(bounds.min_x(), center.y()));
    path.line_to(to_kurbo(center.x(), bounds.min_y()));
    path.line_to(to_kurbo(bounds.max_x(), center.y()));
    path.line_to(to_kurbo(center.x(), bounds.max_y()));
    path.close_path();
    path
}

fn ellipse_path(bounds: Bounds) -> BezPath {
    let rect = Rect::new(
        f64::from(bounds.min_x()),
        f64::from(bounds.min_y()),
        f64::from(bounds.max_x()),
        f64::from(bounds.max_y()),
    );
    Ellipse::from_rect(rect).to_path(ELLIPSE_TOLERANCE)
}
