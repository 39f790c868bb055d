//! Command-line argument definitions for the Scrawl CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, logging verbosity, and per-run overrides of the configuration.

use clap::Parser;

/// Command-line arguments for the Scrawl diagram tool
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input text file
    #[arg(help = "Path to the ASCII-art input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Draw every corner rounded
    #[arg(long)]
    pub round_corners: bool,

    /// Keep walls shared by neighbouring boxes on one line
    #[arg(long)]
    pub no_separation: bool,

    /// Render without drop shadows
    #[arg(long)]
    pub no_shadows: bool,

    /// Tab stop width used when reading the input
    #[arg(long, value_name = "N")]
    pub tabs: Option<usize>,

    /// Fail instead of dropping shapes that cannot be reconstructed
    #[arg(long)]
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["scrawl", "diagram.txt"]).unwrap();
        assert_eq!(args.input, "diagram.txt");
        assert_eq!(args.output, "out.svg");
        assert_eq!(args.log_level, "info");
        assert!(args.config.is_none());
        assert!(!args.round_corners && !args.no_separation && !args.no_shadows && !args.strict);
        assert_eq!(args.tabs, None);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "scrawl",
            "in.txt",
            "-o",
            "pic.svg",
            "--round-corners",
            "--no-separation",
            "--no-shadows",
            "--tabs",
            "4",
            "--strict",
        ])
        .unwrap();

        assert_eq!(args.output, "pic.svg");
        assert!(args.round_corners && args.no_separation && args.no_shadows && args.strict);
        assert_eq!(args.tabs, Some(4));
    }
}
