//! Configuration types for Mosaic ordering and layout.
//!
//! This module provides configuration structures that control how galleries
//! are ordered, laid out, coordinated and previewed. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources, and
//! every section falls back to sensible defaults when omitted.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`LayoutConfig`] - Container widths and gaps for the 2- and 4-column breakpoints.
//! - [`OrderingConfig`] - Local-search bounds for the ordering engine.
//! - [`CoordinatorConfig`] - Progressive threshold and timeouts.
//! - [`CacheConfig`] - Ordering cache capacity.
//! - [`StyleConfig`] - Preview colors.
//!
//! # Example
//!
//! ```
//! # use mosaic::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.ordering().max_passes(), 8);
//! assert!(config.style().background_color().is_ok());
//! ```

use std::time::Duration;

use serde::Deserialize;

use mosaic_core::color::Color;

use crate::{error::MosaicError, layout::ColumnSpec};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Ordering configuration section.
    #[serde(default)]
    ordering: OrderingConfig,

    /// Coordinator configuration section.
    #[serde(default)]
    coordinator: CoordinatorConfig,

    /// Cache configuration section.
    #[serde(default)]
    cache: CacheConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        layout: LayoutConfig,
        ordering: OrderingConfig,
        coordinator: CoordinatorConfig,
        cache: CacheConfig,
        style: StyleConfig,
    ) -> Self {
        Self {
            layout,
            ordering,
            coordinator,
            cache,
            style,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the ordering configuration.
    pub fn ordering(&self) -> &OrderingConfig {
        &self.ordering
    }

    /// Returns the coordinator configuration.
    pub fn coordinator(&self) -> &CoordinatorConfig {
        &self.coordinator
    }

    /// Returns the cache configuration.
    pub fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// One responsive breakpoint: a container width split into equal columns.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BreakpointConfig {
    /// Total container width in pixels.
    container_width: f64,

    /// Gap between columns and between stacked tiles, in pixels.
    gap: f64,
}

impl BreakpointConfig {
    pub fn new(container_width: f64, gap: f64) -> Self {
        Self {
            container_width,
            gap,
        }
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Derives the [`ColumnSpec`] for `columns` equal columns.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::Layout`] if the container is too narrow for the
    /// gaps or any value is invalid.
    pub fn column_spec(&self, columns: usize) -> Result<ColumnSpec, MosaicError> {
        if columns == 0 {
            return Err(MosaicError::Layout("column count must be positive".into()));
        }
        let gaps = self.gap * (columns as f64 - 1.0);
        let column_width = (self.container_width - gaps) / columns as f64;
        ColumnSpec::new(columns, column_width, self.gap)
    }
}

/// Layout configuration for the two responsive presentations.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Breakpoint used for the 2-column presentation.
    #[serde(default = "default_two_column")]
    two_column: BreakpointConfig,

    /// Breakpoint used for the 4-column presentation.
    #[serde(default = "default_four_column")]
    four_column: BreakpointConfig,
}

fn default_two_column() -> BreakpointConfig {
    BreakpointConfig::new(720.0, 8.0)
}

fn default_four_column() -> BreakpointConfig {
    BreakpointConfig::new(1440.0, 16.0)
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            two_column: default_two_column(),
            four_column: default_four_column(),
        }
    }
}

impl LayoutConfig {
    pub fn new(two_column: BreakpointConfig, four_column: BreakpointConfig) -> Self {
        Self {
            two_column,
            four_column,
        }
    }

    /// Returns the 2-column breakpoint.
    pub fn two_column(&self) -> BreakpointConfig {
        self.two_column
    }

    /// Returns the 4-column breakpoint.
    pub fn four_column(&self) -> BreakpointConfig {
        self.four_column
    }
}

/// Ordering engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderingConfig {
    /// Maximum number of adjacent-swap passes per column count.
    #[serde(default = "default_max_passes")]
    max_passes: usize,

    /// Maximum number of candidate swaps scored per column count.
    #[serde(default = "default_max_evaluations")]
    max_evaluations: usize,
}

fn default_max_passes() -> usize {
    8
}

fn default_max_evaluations() -> usize {
    20_000
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            max_passes: default_max_passes(),
            max_evaluations: default_max_evaluations(),
        }
    }
}

impl OrderingConfig {
    pub fn new(max_passes: usize) -> Self {
        Self {
            max_passes,
            max_evaluations: default_max_evaluations(),
        }
    }

    /// Sets the bound on scored swaps.
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Returns the local-search pass bound.
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Returns the bound on scored swaps.
    pub fn max_evaluations(&self) -> usize {
        self.max_evaluations
    }
}

/// Progressive layout and timeout configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CoordinatorConfig {
    /// Resolved-item count that always suffices for a progressive layout.
    #[serde(default = "default_progressive_floor")]
    progressive_floor: usize,

    /// Fraction of the collection that suffices for a progressive layout.
    #[serde(default = "default_progressive_fraction")]
    progressive_fraction: f64,

    /// Time to wait for the progressive threshold before emitting anyway.
    #[serde(default = "default_batch_timeout_ms")]
    batch_timeout_ms: u64,

    /// Time after which the layout is forced and frozen.
    #[serde(default = "default_hard_timeout_ms")]
    hard_timeout_ms: u64,
}

fn default_progressive_floor() -> usize {
    6
}

fn default_progressive_fraction() -> f64 {
    0.3
}

fn default_batch_timeout_ms() -> u64 {
    1500
}

fn default_hard_timeout_ms() -> u64 {
    8000
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            progressive_floor: default_progressive_floor(),
            progressive_fraction: default_progressive_fraction(),
            batch_timeout_ms: default_batch_timeout_ms(),
            hard_timeout_ms: default_hard_timeout_ms(),
        }
    }
}

impl CoordinatorConfig {
    pub fn new(
        progressive_floor: usize,
        progressive_fraction: f64,
        batch_timeout: Duration,
        hard_timeout: Duration,
    ) -> Self {
        Self {
            progressive_floor,
            progressive_fraction,
            batch_timeout_ms: batch_timeout.as_millis() as u64,
            hard_timeout_ms: hard_timeout.as_millis() as u64,
        }
    }

    /// Number of resolved items needed before the first progressive layout.
    ///
    /// The smaller of the floor and the configured fraction of `total`
    /// (rounded up), but at least one.
    pub fn progressive_threshold(&self, total: usize) -> usize {
        let fraction = self.progressive_fraction.clamp(0.0, 1.0);
        let by_fraction = (total as f64 * fraction).ceil() as usize;
        self.progressive_floor.min(by_fraction).max(1)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }

    pub fn hard_timeout(&self) -> Duration {
        Duration::from_millis(self.hard_timeout_ms)
    }
}

/// Ordering cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of collections kept in the cache.
    #[serde(default = "default_capacity")]
    capacity: usize,
}

fn default_capacity() -> usize {
    256
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl CacheConfig {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Visual styling configuration for SVG previews.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] of the preview, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Fill [`Color`] for regular tiles, as a color string.
    #[serde(default)]
    tile_color: Option<String>,

    /// Fill [`Color`] for wide tiles, as a color string.
    #[serde(default)]
    wide_tile_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.background_color.as_deref(), "background")
    }

    /// Returns the parsed regular tile [`Color`], or `None` if not configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the color string is invalid.
    pub fn tile_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.tile_color.as_deref(), "tile")
    }

    /// Returns the parsed wide tile [`Color`], or `None` if not configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the color string is invalid.
    pub fn wide_tile_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.wide_tile_color.as_deref(), "wide tile")
    }
}

fn parse_color(color: Option<&str>, what: &str) -> Result<Option<Color>, String> {
    color
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {what} color in config: {err}"))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_progressive_threshold_takes_smaller_bound() {
        let config = CoordinatorConfig::default();

        // 30% of 100 is 30, floor of 6 wins.
        assert_eq!(config.progressive_threshold(100), 6);
        // 30% of 10 is 3.
        assert_eq!(config.progressive_threshold(10), 3);
        // Never below one.
        assert_eq!(config.progressive_threshold(1), 1);
        assert_eq!(config.progressive_threshold(0), 1);
    }

    #[test]
    fn test_breakpoint_column_spec() {
        let spec = BreakpointConfig::new(620.0, 20.0).column_spec(2).unwrap();

        assert_eq!(spec.columns(), 2);
        assert_approx_eq!(f64, spec.column_width(), 300.0);
        assert_approx_eq!(f64, spec.gap(), 20.0);
    }

    #[test]
    fn test_breakpoint_too_narrow_for_gaps() {
        let breakpoint = BreakpointConfig::new(30.0, 16.0);
        assert!(breakpoint.column_spec(4).is_err());
        assert!(breakpoint.column_spec(0).is_err());
    }

    #[test]
    fn test_style_color_parse_error() {
        let style = StyleConfig {
            background_color: Some("nope".into()),
            ..StyleConfig::default()
        };
        assert!(style.background_color().is_err());
        assert!(style.tile_color().unwrap().is_none());
    }
}
