//! Stroke definitions for rendered outlines.
//!
//! # Overview
//!
//! - [`StrokeStyle`]: solid or dashed line pattern
//! - [`StrokeDefinition`]: colour, width and style of an outline
//! - [`apply_stroke!`](crate::apply_stroke!): applies a definition to an SVG element
//!
//! | Rust Property | SVG Attribute |
//! |---------------|---------------|
//! | `color` | `stroke`, `stroke-opacity` |
//! | `width` | `stroke-width` |
//! | `style` | `stroke-dasharray` |

use crate::color::Color;

/// Line pattern of a stroke.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// Dash length and gap scale with the stroke width.
    Dashed,
}

/// The colour, width and pattern used to draw an outline.
///
/// # Examples
///
/// ```
/// use scrawl_core::{color::Color, stroke::{StrokeDefinition, StrokeStyle}};
///
/// let stroke = StrokeDefinition::new(Color::black(), 1.5).with_style(StrokeStyle::Dashed);
/// assert_eq!(stroke.dasharray().as_deref(), Some("6,4.5"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a solid stroke.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Returns a copy with the given style.
    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Returns the SVG dasharray for this stroke, or `None` when solid.
    pub fn dasharray(&self) -> Option<String> {
        match self.style {
            StrokeStyle::Solid => None,
            StrokeStyle::Dashed => Some(format!("{},{}", self.width * 4.0, self.width * 3.0)),
        }
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// # Examples
///
/// ```
/// use scrawl_core::{color::Color, stroke::StrokeDefinition};
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::new(Color::black(), 2.0);
/// let path = svg_element::Path::new().set("d", "M 0 0 L 10 0");
///
/// let path = scrawl_core::apply_stroke!(path, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.dasharray() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.style(), StrokeStyle::Solid);
        assert_eq!(stroke.dasharray(), None);
    }

    #[test]
    fn test_dashed_pattern_scales_with_width() {
        let stroke = StrokeDefinition::new(Color::black(), 2.0).with_style(StrokeStyle::Dashed);
        assert_eq!(stroke.dasharray().as_deref(), Some("8,6"));
    }

    #[test]
    fn test_apply_stroke_sets_dasharray() {
        let stroke = StrokeDefinition::new(Color::black(), 1.0).with_style(StrokeStyle::Dashed);
        let path = apply_stroke!(svg::node::element::Path::new(), &stroke);
        let rendered = path.to_string();
        assert!(rendered.contains("stroke-dasharray=\"4,3\""));
        assert!(rendered.contains("stroke-width=\"1\""));
    }
}
