//! Error types for reconstruction.
//!
//! Reconstruction never fails as a whole because of a badly drawn glyph.
//! Instead every boundary that cannot be turned into a shape yields a
//! [`MalformedShape`], which carries the [`GeometryError`] that stopped it
//! and, when the cell maps back into the input text, the byte span of the
//! offending glyph. Lenient parsing logs and drops these; strict parsing
//! returns them all as one [`ParseError`].

use std::{fmt, ops::Range};

use thiserror::Error;

use scrawl_core::cell::Cell;

use crate::cellset::Topology;

/// An internal-consistency failure tied to one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("no continuation rule applies to `{glyph}` at {cell}")]
    UnfollowableCell { cell: Cell, glyph: char },

    #[error("outline branches at {cell}")]
    RingBranch { cell: Cell },

    #[error("outline dead-ends at {cell}")]
    DeadEnd { cell: Cell },

    #[error("outline starting at {cell} never returns to its start")]
    RingNotClosed { cell: Cell },

    #[error("no blank area to flood around the boundary at {cell}")]
    NoFillableCell { cell: Cell },

    #[error("cannot place a vertex on `{glyph}` at {cell}")]
    UnclassifiablePoint { cell: Cell, glyph: char },

    #[error("boundary at {cell} is {found}, expected {expected}")]
    TopologyMismatch {
        cell: Cell,
        expected: Topology,
        found: Topology,
    },

    #[error("boundary at {cell} mixes open and closed parts that could not be separated")]
    UnresolvedMixed { cell: Cell },
}

impl GeometryError {
    /// The grid cell the failure was detected at.
    pub fn cell(&self) -> Cell {
        match self {
            Self::UnfollowableCell { cell, .. }
            | Self::RingBranch { cell }
            | Self::DeadEnd { cell }
            | Self::RingNotClosed { cell }
            | Self::NoFillableCell { cell }
            | Self::UnclassifiablePoint { cell, .. }
            | Self::TopologyMismatch { cell, .. }
            | Self::UnresolvedMixed { cell } => *cell,
        }
    }

    /// A stable identifier for the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnfollowableCell { .. } => "scrawl::geometry::unfollowable_cell",
            Self::RingBranch { .. } => "scrawl::geometry::ring_branch",
            Self::DeadEnd { .. } => "scrawl::geometry::dead_end",
            Self::RingNotClosed { .. } => "scrawl::geometry::ring_not_closed",
            Self::NoFillableCell { .. } => "scrawl::geometry::no_fillable_cell",
            Self::UnclassifiablePoint { .. } => "scrawl::geometry::unclassifiable_point",
            Self::TopologyMismatch { .. } => "scrawl::geometry::topology_mismatch",
            Self::UnresolvedMixed { .. } => "scrawl::geometry::unresolved_mixed",
        }
    }

    /// A hint for fixing the drawing.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::UnfollowableCell { .. } | Self::UnclassifiablePoint { .. } => {
                Some("use `+` where lines meet or turn, and `-` `|` for straight runs")
            }
            Self::RingBranch { .. } => Some("a closed outline must not fork; split it into boxes"),
            Self::DeadEnd { .. } | Self::RingNotClosed { .. } => {
                Some("check for a gap or a stray glyph in the outline")
            }
            Self::UnresolvedMixed { .. } => {
                Some("draw lines that leave a box starting from a `+` on its wall")
            }
            Self::NoFillableCell { .. } | Self::TopologyMismatch { .. } => None,
        }
    }
}

/// A boundary dropped during reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedShape {
    error: GeometryError,
    span: Option<Range<usize>>,
}

impl MalformedShape {
    pub fn new(error: GeometryError) -> Self {
        Self { error, span: None }
    }

    /// Attaches the byte range of the offending glyph in the input text.
    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    pub fn error(&self) -> &GeometryError {
        &self.error
    }

    pub fn cell(&self) -> Cell {
        self.error.cell()
    }

    /// Byte range in the input text, when the cell lies inside it.
    pub fn span(&self) -> Option<Range<usize>> {
        self.span.clone()
    }
}

impl fmt::Display for MalformedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

/// Strict-mode failure: every boundary that could not be reconstructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    malformed: Vec<MalformedShape>,
}

impl ParseError {
    pub fn new(malformed: Vec<MalformedShape>) -> Self {
        Self { malformed }
    }

    pub fn malformed(&self) -> &[MalformedShape] {
        &self.malformed
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.malformed.as_slice() {
            [] => write!(f, "diagram could not be reconstructed"),
            [single] => write!(f, "malformed shape: {single}"),
            [first, rest @ ..] => write!(
                f,
                "{} malformed shapes, first: {first}",
                rest.len() + 1
            ),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<MalformedShape> for ParseError {
    fn from(malformed: MalformedShape) -> Self {
        Self::new(vec![malformed])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_cell() {
        let err = GeometryError::RingBranch {
            cell: Cell::new(4, 2),
        };
        assert_eq!(err.cell(), Cell::new(4, 2));
        assert_eq!(err.to_string(), "outline branches at (4, 2)");
        assert!(err.help().is_some());
    }

    #[test]
    fn test_parse_error_display() {
        let one = MalformedShape::new(GeometryError::DeadEnd {
            cell: Cell::new(1, 1),
        });
        let two = MalformedShape::new(GeometryError::UnresolvedMixed {
            cell: Cell::new(2, 3),
        })
        .with_span(4..5);

        assert_eq!(
            ParseError::from(one.clone()).to_string(),
            "malformed shape: outline dead-ends at (1, 1)"
        );
        assert_eq!(
            ParseError::new(vec![one, two.clone()]).to_string(),
            "2 malformed shapes, first: outline dead-ends at (1, 1)"
        );
        assert_eq!(two.span(), Some(4..5));
    }
}
