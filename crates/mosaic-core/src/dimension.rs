//! Image dimensions and the wide-image rule.
//!
//! A [`Dimension`] always carries a strictly positive, finite aspect ratio.
//! Reported values that would break layout math (zero, negative, `NaN`,
//! infinite) are rejected at construction with a [`DimensionError`]; callers
//! then fall back to [`Dimension::unloaded`], which stands in as a square.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aspect ratio at or above which an image is considered wide (16:9).
///
/// Wide images span two adjacent columns in the skyline layout.
pub const WIDE_ASPECT_RATIO: f64 = 16.0 / 9.0;

/// Aspect ratio substituted for images whose dimensions are unknown.
pub const DEFAULT_ASPECT_RATIO: f64 = 1.0;

/// Returns `true` if the aspect ratio qualifies as wide.
///
/// The boundary is inclusive.
///
/// # Examples
///
/// ```
/// # use mosaic_core::dimension::is_wide;
/// assert!(is_wide(1.7778));
/// assert!(!is_wide(1.7777));
/// assert!(is_wide(1920.0 / 1080.0));
/// ```
pub fn is_wide(aspect_ratio: f64) -> bool {
    aspect_ratio >= WIDE_ASPECT_RATIO
}

/// Reasons a reported width/height pair is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DimensionError {
    #[error("width must be positive and finite, got {0}")]
    InvalidWidth(f64),

    #[error("height must be positive and finite, got {0}")]
    InvalidHeight(f64),
}

/// Width, height and derived aspect ratio of an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    width: f64,
    height: f64,
    aspect_ratio: f64,
    from_stored: bool,
    is_loaded: bool,
}

impl Dimension {
    /// Creates a dimension measured from the loaded image.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError`] if either side is not positive and finite.
    pub fn loaded(width: f64, height: f64) -> Result<Self, DimensionError> {
        Self::validated(width, height, false)
    }

    /// Creates a dimension from values stored alongside the item.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError`] if either side is not positive and finite.
    pub fn stored(width: f64, height: f64) -> Result<Self, DimensionError> {
        Self::validated(width, height, true)
    }

    /// A placeholder for an image whose dimensions are not known.
    ///
    /// Lays out as a square: the aspect ratio is [`DEFAULT_ASPECT_RATIO`].
    pub fn unloaded() -> Self {
        Self {
            width: DEFAULT_ASPECT_RATIO,
            height: 1.0,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            from_stored: false,
            is_loaded: false,
        }
    }

    fn validated(width: f64, height: f64, from_stored: bool) -> Result<Self, DimensionError> {
        if !(width.is_finite() && width > 0.0) {
            return Err(DimensionError::InvalidWidth(width));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(DimensionError::InvalidHeight(height));
        }

        let aspect_ratio = width / height;
        // Extreme ratios can still overflow to infinity or underflow to zero.
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(DimensionError::InvalidHeight(height));
        }

        Ok(Self {
            width,
            height,
            aspect_ratio,
            from_stored,
            is_loaded: true,
        })
    }

    /// Returns the width in source pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the height in source pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns `width / height`; always positive and finite.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Returns `true` if the values came from stored item metadata.
    pub fn from_stored(&self) -> bool {
        self.from_stored
    }

    /// Returns `false` for the [`unloaded`](Self::unloaded) placeholder.
    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    /// Returns `true` if this image spans two columns.
    pub fn is_wide(&self) -> bool {
        is_wide(self.aspect_ratio)
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::unloaded()
    }
}
