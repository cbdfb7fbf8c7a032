//! In-process ordering service: engine plus an owned cache.

use log::info;

use mosaic_core::{
    fingerprint::Fingerprint, identifier::CollectionId, item::Item, snapshot::DimensionSnapshot,
};

use super::{CacheLookup, CacheStats, OrderingCache, OrderingEngine};
use crate::{
    config::{AppConfig, CacheConfig, OrderingConfig},
    wire::OrderingResponse,
};

/// Computes and memoizes orderings per collection.
///
/// Orderings are computed from the items' stored dimension hints only, and
/// those hints are part of the collection fingerprint, so the fingerprint
/// fully determines the result and can serve as the cache key.
#[derive(Debug, Default)]
pub struct OrderingService {
    engine: OrderingEngine,
    cache: OrderingCache,
}

impl OrderingService {
    pub fn new(ordering: &OrderingConfig, cache: &CacheConfig) -> Self {
        Self {
            engine: OrderingEngine::new(ordering),
            cache: OrderingCache::new(cache),
        }
    }

    /// Creates a service from the relevant sections of `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.ordering(), config.cache())
    }

    /// Returns the ordering for a collection, computing it on a cache miss.
    pub fn lookup(&self, collection_id: CollectionId, items: &[Item]) -> CacheLookup {
        let fingerprint = Fingerprint::of(items);
        self.cache.get_or_compute(collection_id, &fingerprint, || {
            self.engine.compute_ordering(items, &DimensionSnapshot::new())
        })
    }

    /// Returns the wire response for a collection.
    ///
    /// Empty collections are answered directly without touching the cache.
    pub fn order(&self, collection_id: CollectionId, items: &[Item]) -> OrderingResponse {
        if items.is_empty() {
            return OrderingResponse::empty(collection_id);
        }

        let lookup = self.lookup(collection_id, items);
        info!(
            collection = collection_id.get(),
            items = items.len(),
            from_cache = lookup.from_cache(),
            duration_ms = lookup.compute_duration().as_millis() as u64;
            "Ordering served"
        );
        OrderingResponse::from_lookup(collection_id, &lookup)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Forgets the cached ordering of a collection.
    pub fn invalidate(&self, collection_id: CollectionId) -> bool {
        self.cache.invalidate(collection_id)
    }
}
