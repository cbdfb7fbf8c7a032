//! Collaborator contracts for the coordinator runtime.
//!
//! [`DimensionResolver`] turns an image reference into a [`Resolution`],
//! either immediately or through a future. [`OrderingSource`] fetches the
//! backend ordering for a collection. Both are object safe so the runtime
//! can hold them as `Arc<dyn ...>`.

use std::{collections::HashMap, sync::Arc};

use futures::{FutureExt, future::BoxFuture};

use mosaic_core::{
    dimension::Dimension,
    identifier::{CollectionId, ImageRef},
    item::{DimensionHints, Item},
    ordering::OrderingResult,
};

use crate::{error::MosaicError, ordering::OrderingService, wire};

/// A dimension that arrives later; `None` means the probe failed.
pub type DimensionFuture = BoxFuture<'static, Option<Dimension>>;

/// The answer of a [`DimensionResolver`] for one image.
pub enum Resolution {
    /// The dimension is already known.
    Ready(Dimension),
    /// The dimension is being probed.
    Pending(DimensionFuture),
    /// The dimension cannot be determined; the item is laid out as a square.
    Unavailable,
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(dimension) => f.debug_tuple("Ready").field(dimension).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
            Self::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Determines the natural size of images.
pub trait DimensionResolver: Send + Sync {
    fn resolve(&self, image_ref: &ImageRef) -> Resolution;
}

/// Resolves from a fixed table, typically built from stored hints.
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
    dimensions: HashMap<ImageRef, Dimension>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from the stored width/height hints of `items`.
    pub fn from_stored_hints(items: &[Item]) -> Self {
        let dimensions = items
            .iter()
            .filter_map(|item| {
                item.stored_dimension()
                    .map(|dimension| (item.image_ref().clone(), dimension))
            })
            .collect();
        Self { dimensions }
    }

    pub fn insert(&mut self, image_ref: ImageRef, dimension: Dimension) {
        self.dimensions.insert(image_ref, dimension);
    }
}

impl DimensionResolver for TableResolver {
    fn resolve(&self, image_ref: &ImageRef) -> Resolution {
        match self.dimensions.get(image_ref) {
            Some(dimension) => Resolution::Ready(*dimension),
            None => Resolution::Unavailable,
        }
    }
}

/// Supplies backend orderings.
pub trait OrderingSource: Send + Sync {
    /// Fetches the ordering for `items` of `collection_id`.
    ///
    /// An error degrades the coordinator to the fallback order.
    fn fetch(
        &self,
        collection_id: CollectionId,
        items: Vec<Item>,
    ) -> BoxFuture<'static, Result<OrderingResult, MosaicError>>;
}

/// Serves orderings from an in-process [`OrderingService`].
#[derive(Debug, Clone)]
pub struct LocalOrderingSource {
    service: Arc<OrderingService>,
}

impl LocalOrderingSource {
    pub fn new(service: Arc<OrderingService>) -> Self {
        Self { service }
    }
}

impl OrderingSource for LocalOrderingSource {
    fn fetch(
        &self,
        collection_id: CollectionId,
        items: Vec<Item>,
    ) -> BoxFuture<'static, Result<OrderingResult, MosaicError>> {
        let service = Arc::clone(&self.service);
        async move { Ok(service.order(collection_id, &items).into_order()) }.boxed()
    }
}

/// Serves a pre-fetched response body, decoded on every fetch.
#[derive(Debug, Clone)]
pub struct StaticOrderingSource {
    body: Arc<str>,
}

impl StaticOrderingSource {
    pub fn new(body: impl Into<Arc<str>>) -> Self {
        Self { body: body.into() }
    }
}

impl OrderingSource for StaticOrderingSource {
    fn fetch(
        &self,
        _collection_id: CollectionId,
        _items: Vec<Item>,
    ) -> BoxFuture<'static, Result<OrderingResult, MosaicError>> {
        let body = Arc::clone(&self.body);
        async move { wire::decode_response(&body).map(wire::OrderingResponse::into_order) }.boxed()
    }
}
