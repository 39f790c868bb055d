//! The reconstructed diagram: shapes, text labels and canvas geometry.

use crate::{
    color::Color,
    geometry::{Bounds, CellMetrics, Size},
    shape::Shape,
};

/// Horizontal placement of a label inside its bounds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Start,
    Middle,
    End,
}

/// A run of text found in the grid.
///
/// `bounds` covers the cells the text occupied; renderers position the text
/// inside it according to `align`.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    bounds: Bounds,
    align: TextAlign,
    color: Color,
}

impl Label {
    pub fn new(text: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            text: text.into(),
            bounds,
            align: TextAlign::default(),
            color: Color::default(),
        }
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// The output of reconstruction.
///
/// # Examples
///
/// ```
/// use scrawl_core::{diagram::Diagram, geometry::CellMetrics};
///
/// let diagram = Diagram::new(CellMetrics::default(), 12, 5);
/// assert_eq!(diagram.size().width(), 120.0);
/// assert_eq!(diagram.size().height(), 70.0);
/// assert!(diagram.shapes().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    metrics: CellMetrics,
    columns: usize,
    rows: usize,
    shapes: Vec<Shape>,
    labels: Vec<Label>,
}

impl Diagram {
    /// Creates an empty diagram over a grid of `columns` x `rows` cells.
    pub fn new(metrics: CellMetrics, columns: usize, rows: usize) -> Self {
        Self {
            metrics,
            columns,
            rows,
            shapes: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn with_shapes(mut self, shapes: Vec<Shape>) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Number of grid columns, including the blank border.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of grid rows, including the blank border.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> Size {
        self.metrics.grid_size(self.columns, self.rows)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Closed shapes in input order.
    pub fn closed_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|shape| shape.is_closed())
    }

    /// Open shapes in input order.
    pub fn open_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|shape| !shape.is_closed())
    }
}
