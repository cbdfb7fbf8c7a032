//! Export functionality for computed layouts.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! converting a placed [`Layout`] into an output format. It is the final
//! stage of the pipeline and is used for previews; the gallery frontend
//! consumes the rectangles directly.
//!
//! # Pipeline Position
//!
//! ```text
//! Items + DimensionSnapshot
//!     ↓ ordering
//! OrderingResult
//!     ↓ layout
//! Layout
//!     ↓ export (this module)
//! Output File
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG preview via [`svg::SvgBuilder`] and [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`MosaicError::Export`] at the crate
//! boundary.
//!
//! [`MosaicError::Export`]: crate::MosaicError::Export

/// SVG export backend.
pub mod svg;

use crate::layout::Layout;

/// Abstraction for layout export backends.
pub trait Exporter {
    /// Exports a layout to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_layout(&mut self, layout: &Layout) -> Result<(), Error>;
}

/// Errors that can occur during layout export.
///
/// This type is converted into [`MosaicError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`MosaicError::Export`]: crate::MosaicError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
