//! # Scrawl Parser
//!
//! Reconstructs vector shapes from ASCII-art diagrams. Boxes drawn with
//! `+`, `-` and `|` become polygons, lines become polylines, `<` `>` `^`
//! `v` at line ends become arrowheads, and the remaining text becomes
//! positioned labels.
//!
//! ## Usage
//!
//! ```
//! # use scrawl_parser::{parse, ParseConfig, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "\
//! +-------+
//! | hello |---->
//! +-------+";
//!
//!     let diagram = parse(source, &ParseConfig::default())?;
//!     assert_eq!(diagram.closed_shapes().count(), 2);
//!     assert_eq!(diagram.labels()[0].text(), "hello");
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Load** - expand tabs, pad with a blank border, substitute
//!    shorthand ([`grid::TextGrid::load`])
//! 2. **Boundaries** - split boundary cells into open and closed sets
//!    ([`reconstruct::find_boundaries`])
//! 3. **Shapes** - walk closed sets into polygons and grow open sets into
//!    polylines ([`shapes::ShapeFactory`])
//! 4. **Separation** - pull apart walls shared by two boxes
//!    ([`separate::separate_common_edges`])
//! 5. **Decoration** - colour codes, markup tags, arrowheads and point
//!    markers ([`markup`])
//! 6. **Text** - the labels left once everything else is blanked out
//!    ([`text::extract_labels`])

pub mod abstraction;
pub mod cellset;
pub mod classify;
pub mod error;
pub mod grid;
pub mod markup;
pub mod reconstruct;
pub mod separate;
pub mod shapes;
pub mod text;

pub use error::{GeometryError, MalformedShape, ParseError};

use log::{debug, trace, warn};

use scrawl_core::{diagram::Diagram, geometry::CellMetrics};

use grid::{TextGrid, source_span};
use shapes::{ShapeFactory, remove_duplicate_shapes};

/// Options for reconstruction.
///
/// # Examples
///
/// ```
/// use scrawl_parser::ParseConfig;
///
/// let config = ParseConfig::default().with_tab_size(4).with_strict(true);
/// assert_eq!(config.tab_size(), 4);
/// assert!(config.separate_common_edges());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    tab_size: usize,
    all_corners_round: bool,
    separate_common_edges: bool,
    strict: bool,
    metrics: CellMetrics,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            tab_size: grid::DEFAULT_TAB_SIZE,
            all_corners_round: false,
            separate_common_edges: true,
            strict: false,
            metrics: CellMetrics::default(),
        }
    }
}

impl ParseConfig {
    /// Tab stop width used when loading text.
    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    pub fn all_corners_round(&self) -> bool {
        self.all_corners_round
    }

    pub fn separate_common_edges(&self) -> bool {
        self.separate_common_edges
    }

    /// Whether any malformed shape fails the whole parse.
    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size.max(1);
        self
    }

    pub fn with_all_corners_round(mut self, all_corners_round: bool) -> Self {
        self.all_corners_round = all_corners_round;
        self
    }

    pub fn with_separate_common_edges(mut self, separate: bool) -> Self {
        self.separate_common_edges = separate;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_metrics(mut self, metrics: CellMetrics) -> Self {
        self.metrics = metrics;
        self
    }
}

/// A reconstructed diagram together with the boundaries that had to be
/// dropped on the way.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    diagram: Diagram,
    malformed: Vec<MalformedShape>,
}

impl Reconstruction {
    pub fn new(diagram: Diagram, malformed: Vec<MalformedShape>) -> Self {
        Self { diagram, malformed }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Boundaries that could not be turned into shapes.
    pub fn malformed(&self) -> &[MalformedShape] {
        &self.malformed
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    /// The diagram, or in strict mode an error when anything was dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] listing every malformed shape when `strict`
    /// is set and at least one boundary was dropped.
    pub fn finish(self, strict: bool) -> Result<Diagram, ParseError> {
        if strict && !self.malformed.is_empty() {
            return Err(ParseError::new(self.malformed));
        }
        Ok(self.diagram)
    }
}

/// Runs the full pipeline over a loaded grid.
///
/// Never fails: boundaries that cannot be reconstructed are logged and
/// listed in [`Reconstruction::malformed`].
pub fn reconstruct(grid: &TextGrid, config: &ParseConfig) -> Reconstruction {
    let metrics = config.metrics();
    let mut work = grid.clone();
    work.replace_type_on_line();
    work.replace_point_markers_on_line();
    trace!("Work grid:\n{work}");

    let boundaries = reconstruct::find_boundaries(&work);
    let mut malformed = boundaries.malformed;
    let factory = ShapeFactory::new(metrics).with_all_corners_round(config.all_corners_round());

    let mut shapes = Vec::new();
    for set in &boundaries.closed {
        match factory.closed_shape(&work, set) {
            Ok(shape) => shapes.extend(shape),
            Err(err) => {
                warn!(cell:% = err.cell(), err:% = err; "Dropping closed boundary");
                malformed.push(MalformedShape::new(err));
            }
        }
    }
    if config.separate_common_edges() {
        separate::separate_common_edges(&mut shapes, metrics);
    }

    for set in &boundaries.open {
        match factory.open_shapes(&work, set) {
            Ok(open) => shapes.extend(open),
            Err(err) => {
                warn!(cell:% = err.cell(), err:% = err; "Dropping open boundary");
                malformed.push(MalformedShape::new(err));
            }
        }
    }

    markup::apply_color_codes(&mut shapes, &markup::find_color_codes(grid), metrics);
    markup::apply_markup_tags(&mut shapes, &markup::find_markup_tags(grid), metrics);
    shapes.extend(factory.arrowheads(&work));
    shapes.extend(factory.point_markers(grid));
    let shapes = remove_duplicate_shapes(shapes);

    let labels = text::extract_labels(grid, &shapes, metrics);
    debug!(
        shapes = shapes.len(),
        labels = labels.len(),
        malformed = malformed.len();
        "Reconstruction complete"
    );

    let diagram = Diagram::new(metrics, grid.width(), grid.height())
        .with_shapes(shapes)
        .with_labels(labels);
    Reconstruction::new(diagram, malformed)
}

/// Loads `source` and reconstructs it, attaching source spans to every
/// malformed shape that maps back into the text.
pub fn reconstruct_source(source: &str, config: &ParseConfig) -> Reconstruction {
    let grid = TextGrid::load(source, config.tab_size());
    let reconstruction = reconstruct(&grid, config);
    let malformed = reconstruction
        .malformed
        .into_iter()
        .map(|shape| match source_span(source, config.tab_size(), shape.cell()) {
            Some(span) => shape.with_span(span),
            None => shape,
        })
        .collect();
    Reconstruction::new(reconstruction.diagram, malformed)
}

/// Parses diagram text into shapes and labels.
///
/// # Errors
///
/// In strict mode, returns a [`ParseError`] when any boundary could not be
/// reconstructed. Lenient parsing never fails.
pub fn parse(source: &str, config: &ParseConfig) -> Result<Diagram, ParseError> {
    reconstruct_source(source, config).finish(config.strict())
}

#[cfg(test)]
mod tests {
    use scrawl_core::cell::Cell;

    use super::*;

    fn dropped() -> Reconstruction {
        let diagram = Diagram::new(CellMetrics::default(), 5, 5);
        let malformed = MalformedShape::new(GeometryError::DeadEnd {
            cell: Cell::new(2, 2),
        });
        Reconstruction::new(diagram, vec![malformed])
    }

    #[test]
    fn test_parse_config_defaults() {
        let config = ParseConfig::default();
        assert_eq!(config.tab_size(), 8);
        assert!(!config.all_corners_round());
        assert!(config.separate_common_edges());
        assert!(!config.strict());
        assert_eq!(config.metrics(), CellMetrics::default());
    }

    #[test]
    fn test_tab_size_is_at_least_one() {
        assert_eq!(ParseConfig::default().with_tab_size(0).tab_size(), 1);
    }

    #[test]
    fn test_finish_lenient_keeps_diagram() {
        let diagram = dropped().finish(false).unwrap();
        assert_eq!(diagram.columns(), 5);
    }

    #[test]
    fn test_finish_strict_reports_malformed() {
        let err = dropped().finish(true).unwrap_err();
        assert_eq!(err.malformed().len(), 1);
        assert_eq!(err.malformed()[0].cell(), Cell::new(2, 2));
    }

    #[test]
    fn test_reconstruct_source_attaches_spans() {
        let reconstruction = reconstruct_source("+--+\n|  |\n+--+", &ParseConfig::default());
        assert!(reconstruction.malformed().is_empty());
        assert_eq!(reconstruction.diagram().closed_shapes().count(), 1);
    }
}
