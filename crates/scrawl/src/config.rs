//! Configuration types for Scrawl diagram processing.
//!
//! This module provides configuration structures that control how ASCII art
//! is reconstructed and how the result is styled. All types implement
//! [`serde::Deserialize`] for loading from external sources; every field is
//! optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining processing and style settings.
//! - [`ProcessingConfig`] - Controls reconstruction: tabs, corners, edge separation, strictness.
//! - [`StyleConfig`] - Controls rendering: background, shadows, stroke width.
//!
//! # Example
//!
//! ```
//! # use scrawl::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [processing]
//!     tab_size = 4
//!
//!     [style]
//!     shadows = false
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.processing().tab_size(), 4);
//! assert!(config.processing().separate_common_edges());
//! assert!(!config.style().shadows());
//! ```

use serde::Deserialize;

use scrawl_core::{color::Color, geometry::CellMetrics};
use scrawl_parser::ParseConfig;

/// Top-level application configuration combining processing and style
/// settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Reconstruction configuration section.
    #[serde(default)]
    processing: ProcessingConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    ///
    /// # Arguments
    ///
    /// * `processing` - Reconstruction settings.
    /// * `style` - Visual styling options.
    pub fn new(processing: ProcessingConfig, style: StyleConfig) -> Self {
        Self { processing, style }
    }

    /// Returns the processing configuration.
    pub fn processing(&self) -> &ProcessingConfig {
        &self.processing
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Reconstruction settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    tab_size: usize,
    all_corners_round: bool,
    separate_common_edges: bool,
    strict: bool,
    cell_width: u32,
    cell_height: u32,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        let parse = ParseConfig::default();
        Self {
            tab_size: parse.tab_size(),
            all_corners_round: parse.all_corners_round(),
            separate_common_edges: parse.separate_common_edges(),
            strict: parse.strict(),
            cell_width: CellMetrics::DEFAULT_CELL_WIDTH,
            cell_height: CellMetrics::DEFAULT_CELL_HEIGHT,
        }
    }
}

impl ProcessingConfig {
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

    /// Whether a malformed shape fails the whole parse.
    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Pixel size of one character cell.
    pub fn cell_metrics(&self) -> CellMetrics {
        CellMetrics::new(self.cell_width, self.cell_height)
    }

    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
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

    /// The [`ParseConfig`] handed to the reconstruction engine.
    pub fn to_parse_config(&self) -> ParseConfig {
        ParseConfig::default()
            .with_tab_size(self.tab_size)
            .with_all_corners_round(self.all_corners_round)
            .with_separate_common_edges(self.separate_common_edges)
            .with_strict(self.strict)
            .with_metrics(self.cell_metrics())
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background [`Color`] for diagrams, as a color string.
    background_color: Option<String>,

    /// Whether solid closed shapes drop a blurred shadow.
    shadows: bool,

    /// Width of every outline in pixels.
    stroke_width: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            shadows: true,
            stroke_width: 1.0,
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn shadows(&self) -> bool {
        self.shadows
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }
}
