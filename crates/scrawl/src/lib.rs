//! Scrawl - turns ASCII-art diagrams into vector graphics.
//!
//! Boxes, lines, arrows and text drawn with plain characters are
//! reconstructed into shapes and labels, then rendered as SVG.

pub mod config;
pub mod export;

mod error;

pub use scrawl_core::{cell, color, diagram, geometry, shape, stroke};
pub use scrawl_parser::{MalformedShape, Reconstruction};

pub use error::ScrawlError;

use log::{debug, info, trace, warn};

use config::AppConfig;
use export::Exporter;

/// Builder for parsing and rendering Scrawl diagrams.
///
/// # Examples
///
/// ```rust
/// use scrawl::{DiagramBuilder, config::AppConfig};
///
/// let source = "\
/// +-----+
/// | box +--->
/// +-----+";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Reconstruct shapes and labels
/// let diagram = builder.parse(source).expect("Failed to parse");
/// assert_eq!(diagram.labels()[0].text(), "box");
///
/// // Render them to SVG
/// let svg = builder.render_svg(&diagram).expect("Failed to render");
/// assert!(svg.contains("<svg"));
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including processing and style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// The configuration this builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Reconstruct shapes and labels from diagram text.
    ///
    /// Boundaries that cannot be reconstructed are logged and dropped, unless
    /// the processing configuration is strict.
    ///
    /// # Arguments
    ///
    /// * `source` - The ASCII-art diagram
    ///
    /// # Errors
    ///
    /// Returns [`ScrawlError::Parse`] in strict mode when any boundary is
    /// malformed.
    pub fn parse(&self, source: &str) -> Result<diagram::Diagram, ScrawlError> {
        let reconstruction = self.reconstruct(source);
        reconstruction
            .finish(self.config.processing().strict())
            .map_err(|err| ScrawlError::new_parse_error(err, source))
    }

    /// Reconstruct diagram text, keeping every dropped boundary next to the
    /// diagram instead of failing.
    pub fn reconstruct(&self, source: &str) -> Reconstruction {
        info!(bytes = source.len(); "Reconstructing diagram");

        let parse_config = self.config.processing().to_parse_config();
        let reconstruction = scrawl_parser::reconstruct_source(source, &parse_config);

        let diagram = reconstruction.diagram();
        debug!(
            shapes = diagram.shapes().len(),
            labels = diagram.labels().len();
            "Diagram reconstructed"
        );
        if !reconstruction.malformed().is_empty() {
            warn!(malformed = reconstruction.malformed().len(); "Some shapes could not be reconstructed");
        }
        trace!(diagram:? = diagram; "Reconstructed diagram");

        reconstruction
    }

    /// Render a reconstructed diagram to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`ScrawlError::Config`] for an invalid style configuration and
    /// [`ScrawlError::Export`] when rendering fails.
    pub fn render_svg(&self, diagram: &diagram::Diagram) -> Result<String, ScrawlError> {
        let style = self.config.style();
        let background = style.background_color().map_err(ScrawlError::Config)?;

        let mut exporter = export::svg::SvgBuilder::new()
            .with_background(background)
            .with_shadows(style.shadows())
            .with_stroke_width(style.stroke_width())
            .build()?;

        let mut buffer = Vec::new();
        exporter.export_diagram(diagram, &mut buffer)?;
        let svg = String::from_utf8(buffer).map_err(|err| ScrawlError::Export(Box::new(err)))?;

        info!(bytes = svg.len(); "SVG rendered successfully");
        Ok(svg)
    }
}
