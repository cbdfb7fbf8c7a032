//! Command-line argument definitions for the Mosaic CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the optional SVG
//! preview, configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// Column count of the SVG preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreviewColumns {
    #[value(name = "2")]
    Two,
    #[value(name = "4")]
    Four,
}

impl PreviewColumns {
    pub fn count(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
        }
    }
}

/// Command-line arguments for the Mosaic layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input collection file (JSON)
    #[arg(help = "Path to the input collection file")]
    pub input: String,

    /// Path to the output layout file (JSON)
    #[arg(short, long, default_value = "layout.json")]
    pub output: String,

    /// Path to an SVG preview of the layout
    #[arg(long)]
    pub svg: Option<String>,

    /// Column count of the SVG preview
    #[arg(long, value_enum, default_value = "4")]
    pub columns: PreviewColumns,

    /// Precomputed ordering response (JSON) to lay out instead of ordering locally
    #[arg(long)]
    pub ordering: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
