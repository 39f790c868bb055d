//! CLI logic for the Scrawl diagram tool.
//!
//! This module contains the core CLI logic: configuration loading, the
//! reconstruction and rendering run, and output writing.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use scrawl::{DiagramBuilder, ScrawlError};

/// Run the Scrawl CLI application
///
/// This function reconstructs the diagram drawn in the input file and
/// writes the resulting SVG to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ScrawlError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed shapes in strict mode
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), ScrawlError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let app_config = config::apply_overrides(app_config, args);

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let diagram = builder.parse(&source)?;
    let svg = builder.render_svg(&diagram)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
