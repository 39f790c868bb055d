//! Export functionality for reconstructed diagrams.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! writing a reconstructed [`Diagram`] in an output format. It is the final
//! stage of the pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! ASCII Art
//!     ↓ load
//! Character Grid
//!     ↓ reconstruct
//! Shapes + Labels (Diagram)
//!     ↓ export (this module)
//! Output Document
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] — SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`ScrawlError::Export`] at the crate
//! boundary.
//!
//! [`ScrawlError::Export`]: crate::ScrawlError::Export

/// SVG export backend.
pub mod svg;

use std::io::Write;

use scrawl_core::diagram::Diagram;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Writes `diagram` to `writer` in the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the diagram cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_diagram(&mut self, diagram: &Diagram, writer: &mut dyn Write) -> Result<(), Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
