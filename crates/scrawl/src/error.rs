//! Error types for Scrawl operations.
//!
//! This module provides the main error type [`ScrawlError`] which wraps
//! the error conditions that can occur while turning a drawing into SVG.

use std::io;

use thiserror::Error;

use scrawl_parser::ParseError;

/// The main error type for Scrawl operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the strict-mode
/// [`ParseError`], so every malformed shape can be reported at the glyph
/// that broke it.
#[derive(Debug, Error)]
pub enum ScrawlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for ScrawlError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl ScrawlError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
