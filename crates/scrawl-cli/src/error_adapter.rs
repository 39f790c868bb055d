//! Error adapter for converting ScrawlError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A strict-mode [`scrawl_parser::ParseError`] lists every shape that could
//! not be reconstructed; each one is rendered as its own report, labelled at
//! the glyph where reconstruction stopped.

use std::{fmt, ops::Range};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use scrawl::{MalformedShape, ScrawlError};

/// Adapter for a single malformed shape.
pub struct MalformedShapeAdapter<'a> {
    /// The wrapped malformed shape
    shape: &'a MalformedShape,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> MalformedShapeAdapter<'a> {
    /// Create a new malformed shape adapter.
    pub fn new(shape: &'a MalformedShape, src: &'a str) -> Self {
        Self { shape, src }
    }
}

impl fmt::Debug for MalformedShapeAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MalformedShapeAdapter")
            .field("shape", &self.shape)
            .finish()
    }
}

impl fmt::Display for MalformedShapeAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed shape: {}", self.shape)
    }
}

impl std::error::Error for MalformedShapeAdapter<'_> {}

impl MietteDiagnostic for MalformedShapeAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.shape.error().code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.shape
            .error()
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.shape
            .span()
            .map(|_| &self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.shape.span()?;
        let label = LabeledSpan::new_primary_with_span(
            Some("reconstruction stopped here".to_string()),
            span_to_miette(span),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for non-diagnostic [`ScrawlError`] variants.
///
/// This adapter handles errors without source locations: I/O,
/// configuration and export errors.
pub struct ErrorAdapter<'a>(pub &'a ScrawlError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ScrawlError::Io(_) => "scrawl::io",
            ScrawlError::Parse { .. } => "scrawl::parse",
            ScrawlError::Config(_) => "scrawl::config",
            ScrawlError::Export(_) => "scrawl::export",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single malformed shape or a non-diagnostic
/// error, providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A malformed shape with its source location.
    Malformed(MalformedShapeAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Malformed(m) => fmt::Display::fmt(m, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Malformed(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Malformed(m) => m.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Malformed(m) => m.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Malformed(m) => m.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Malformed(m) => m.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

fn span_to_miette(span: Range<usize>) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

/// Convert a [`ScrawlError`] into a list of reportable errors.
///
/// For [`ScrawlError::Parse`], this returns one [`Reportable`] for each
/// malformed shape. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &ScrawlError) -> Vec<Reportable<'_>> {
    match err {
        ScrawlError::Parse { err: parse_err, src } if !parse_err.malformed().is_empty() => {
            parse_err
                .malformed()
                .iter()
                .map(|shape| Reportable::Malformed(MalformedShapeAdapter::new(shape, src)))
                .collect()
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use scrawl::cell::Cell;
    use scrawl_parser::{GeometryError, ParseError};

    use super::*;

    fn dead_end(x: i32, y: i32) -> MalformedShape {
        MalformedShape::new(GeometryError::DeadEnd {
            cell: Cell::new(x, y),
        })
    }

    #[test]
    fn test_single_malformed_shape() {
        let shape = dead_end(3, 2).with_span(1..2);
        let err = ScrawlError::new_parse_error(ParseError::from(shape), "+-+ \n| \n");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Malformed(m) => {
                assert_eq!(m.to_string(), "malformed shape: outline dead-ends at (3, 2)");
                assert_eq!(
                    m.code().map(|code| code.to_string()).as_deref(),
                    Some("scrawl::geometry::dead_end")
                );
                assert!(m.help().is_some());
            }
            Reportable::Error(_) => panic!("Expected Malformed"),
        }
    }

    #[test]
    fn test_multiple_malformed_shapes() {
        let parse_err = ParseError::new(vec![
            dead_end(2, 2).with_span(0..1),
            MalformedShape::new(GeometryError::RingBranch {
                cell: Cell::new(4, 3),
            })
            .with_span(6..7),
            dead_end(9, 9),
        ]);
        let err = ScrawlError::new_parse_error(parse_err, "+--+  +\n+--+");

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 3);
        assert_eq!(
            reportables[1].to_string(),
            "malformed shape: outline branches at (4, 3)"
        );
    }

    #[test]
    fn test_label_follows_span() {
        let shape = dead_end(2, 2).with_span(5..6);
        let adapter = MalformedShapeAdapter::new(&shape, "some source");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert_eq!(labels[0].offset(), 5);
        assert_eq!(labels[0].len(), 1);
        assert!(adapter.source_code().is_some());
    }

    #[test]
    fn test_shape_outside_source_has_no_label() {
        let shape = dead_end(0, 0);
        let adapter = MalformedShapeAdapter::new(&shape, "src");

        assert!(adapter.labels().is_none());
        assert!(adapter.source_code().is_none());
    }

    #[test]
    fn test_non_parse_error() {
        let err = ScrawlError::Config("bad value".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad value");
                assert_eq!(
                    e.code().map(|code| code.to_string()).as_deref(),
                    Some("scrawl::config")
                );
            }
            Reportable::Malformed(_) => panic!("Expected Error"),
        }
    }
}
