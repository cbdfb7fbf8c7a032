//! Error types for Mosaic operations.
//!
//! This module provides the main error type [`MosaicError`]. Most degraded
//! conditions (missing dimensions, unavailable ordering, timeouts) are not
//! errors at all: the engines fall back and keep rendering. `MosaicError`
//! covers what genuinely cannot proceed, such as an invalid column
//! configuration or an unreadable input file.

use std::io;

use thiserror::Error;

/// The main error type for Mosaic operations.
#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Ordering error: {0}")]
    Ordering(String),

    #[error("Wire format error: {0}")]
    Wire(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for MosaicError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
