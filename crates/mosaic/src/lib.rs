//! Mosaic - Masonry ordering and skyline layout for image galleries.
//!
//! Computes a display order for variable-aspect-ratio images in 2- and
//! 4-column presentations and turns that order, plus whatever image
//! dimensions are known so far, into exact tile rectangles.

pub mod config;
pub mod coordinator;
pub mod export;
pub mod layout;
pub mod ordering;
pub mod wire;

mod error;

pub use mosaic_core::{color, dimension, fingerprint, geometry, identifier, item, snapshot};

pub use error::MosaicError;

use log::{debug, info};

use mosaic_core::{item::Item, snapshot::DimensionSnapshot};

use config::AppConfig;
use coordinator::LayoutCoordinator;
use export::svg::SvgBuilder;
use layout::{Layout, ResponsiveLayout};
use ordering::{CacheStats, OrderingResult, OrderingService};
use wire::{CollectionPayload, OrderingResponse};

/// Builder for ordering, laying out and previewing gallery collections.
///
/// Holds the configuration and an [`OrderingService`], so repeated
/// [`order`](Self::order) calls for an unchanged collection are served from
/// its cache.
///
/// # Examples
///
/// ```rust
/// use mosaic::{
///     MosaicBuilder, identifier::CollectionId, item::Item, snapshot::DimensionSnapshot,
///     wire::CollectionPayload,
/// };
///
/// let items = vec![
///     Item::new(1, "sunset.jpg").with_votes(4).with_stored_size(1920.0, 1080.0),
///     Item::new(2, "portrait.jpg").with_stored_size(600.0, 900.0),
/// ];
/// let builder = MosaicBuilder::default();
///
/// // Compute the ordering response for the collection
/// let response = builder.order(&CollectionPayload::new(CollectionId::new(7), items.clone()));
///
/// // Lay the collection out with the backend order
/// let layout = builder
///     .layout(&items, Some(response.order()), &DimensionSnapshot::new())
///     .expect("Failed to lay out");
///
/// let svg = builder.render_svg(layout.two_column()).expect("Failed to render");
/// assert!(svg.contains("<svg"));
/// ```
pub struct MosaicBuilder {
    config: AppConfig,
    service: OrderingService,
}

impl Default for MosaicBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl MosaicBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mosaic::{MosaicBuilder, config::AppConfig};
    ///
    /// let builder = MosaicBuilder::new(AppConfig::default());
    /// ```
    pub fn new(config: AppConfig) -> Self {
        let service = OrderingService::from_config(&config);
        Self { config, service }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Computes (or fetches from cache) the ordering response for a collection.
    pub fn order(&self, payload: &CollectionPayload) -> OrderingResponse {
        info!(
            collection = payload.collection_id().get(),
            items = payload.items().len();
            "Ordering collection"
        );
        self.service.order(payload.collection_id(), payload.items())
    }

    /// Computes the 2- and 4-column layouts.
    ///
    /// Falls back to the input order when `ordering` is missing or does not
    /// describe `items`.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::Layout`] if the configured breakpoints are invalid.
    pub fn layout(
        &self,
        items: &[Item],
        ordering: Option<&OrderingResult>,
        snapshot: &DimensionSnapshot,
    ) -> Result<ResponsiveLayout, MosaicError> {
        let layout = ResponsiveLayout::compute(items, ordering, snapshot, self.config.layout())?;
        debug!(
            items = items.len(),
            source:? = layout.source(),
            height_2col = layout.two_column().container_height(),
            height_4col = layout.four_column().container_height();
            "Layout computed"
        );
        Ok(layout)
    }

    /// Renders a layout to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::Export`] if a configured style color is invalid.
    pub fn render_svg(&self, layout: &Layout) -> Result<String, MosaicError> {
        let svg = SvgBuilder::in_memory()
            .with_style(self.config.style())
            .build()?;
        let document = svg.render_layout(layout);

        info!(tiles = layout.len(); "SVG rendered successfully");
        Ok(document.to_string())
    }

    /// Creates an idle [`LayoutCoordinator`] using this builder's configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::Layout`] if the configured breakpoints are invalid.
    pub fn coordinator(&self) -> Result<LayoutCoordinator, MosaicError> {
        LayoutCoordinator::new(&self.config)
    }

    /// Hit/miss statistics of the ordering cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.service.cache_stats()
    }
}
