//! Error adapter for converting MosaicError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use mosaic::MosaicError;

/// Adapter for [`MosaicError`] variants.
///
/// Mosaic errors carry no source spans, so the adapter contributes a
/// diagnostic code and, where one exists, a hint.
pub struct ErrorAdapter<'a>(pub &'a MosaicError);

impl ErrorAdapter<'_> {
    fn code_str(&self) -> &'static str {
        match self.0 {
            MosaicError::Io(_) => "mosaic::io",
            MosaicError::Config(_) => "mosaic::config",
            MosaicError::Layout(_) => "mosaic::layout",
            MosaicError::Ordering(_) => "mosaic::ordering",
            MosaicError::Wire(_) => "mosaic::wire",
            MosaicError::Export(_) => "mosaic::export",
        }
    }

    fn help_str(&self) -> Option<&'static str> {
        match self.0 {
            MosaicError::Config(_) => Some("check the TOML passed with --config"),
            MosaicError::Layout(_) => Some("container widths must exceed the gaps between columns"),
            MosaicError::Wire(_) => {
                Some("collections look like {\"collectionId\": 1, \"items\": [...]}")
            }
            _ => None,
        }
    }
}

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
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_str()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert a [`MosaicError`] into a list of reportable errors.
pub fn to_reportables(err: &MosaicError) -> Vec<ErrorAdapter<'_>> {
    vec![ErrorAdapter(err)]
}
