//! JSON wire format for ordering responses and collection payloads.
//!
//! Field names are fixed and shared with the gallery frontend:
//!
//! ```json
//! {
//!   "order": {
//!     "orderedIds2col": [1], "orderedIds4col": [1], "count": 1,
//!     "avgAspectRatio": 1.0, "wideImageCount": 0
//!   },
//!   "cacheInfo": {
//!     "computedAt": "2026-01-01T00:00:00Z", "collectionId": 7,
//!     "fromCache": false, "versionHash": "…", "computeDurationMs": 0
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use mosaic_core::{
    fingerprint::Fingerprint, identifier::CollectionId, item::Item, ordering::OrderingResult,
};

use crate::{error::MosaicError, ordering::CacheLookup};

/// Provenance of an ordering response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    #[serde(with = "time::serde::rfc3339")]
    computed_at: OffsetDateTime,
    collection_id: CollectionId,
    from_cache: bool,
    version_hash: Fingerprint,
    compute_duration_ms: u64,
}

impl CacheInfo {
    pub fn computed_at(&self) -> OffsetDateTime {
        self.computed_at
    }

    pub fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    /// The collection fingerprint the order was computed for.
    pub fn version_hash(&self) -> &Fingerprint {
        &self.version_hash
    }

    pub fn compute_duration_ms(&self) -> u64 {
        self.compute_duration_ms
    }
}

/// An ordering together with its cache provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderingResponse {
    order: OrderingResult,
    cache_info: CacheInfo,
}

impl OrderingResponse {
    /// Builds a response from a cache lookup.
    pub fn from_lookup(collection_id: CollectionId, lookup: &CacheLookup) -> Self {
        Self {
            order: lookup.result().clone(),
            cache_info: CacheInfo {
                computed_at: lookup.computed_at(),
                collection_id,
                from_cache: lookup.from_cache(),
                version_hash: lookup.fingerprint().clone(),
                compute_duration_ms: lookup.compute_duration().as_millis() as u64,
            },
        }
    }

    /// The response for an empty collection.
    pub fn empty(collection_id: CollectionId) -> Self {
        Self {
            order: OrderingResult::empty(),
            cache_info: CacheInfo {
                computed_at: OffsetDateTime::now_utc(),
                collection_id,
                from_cache: false,
                version_hash: Fingerprint::empty(),
                compute_duration_ms: 0,
            },
        }
    }

    pub fn order(&self) -> &OrderingResult {
        &self.order
    }

    pub fn cache_info(&self) -> &CacheInfo {
        &self.cache_info
    }

    pub fn into_order(self) -> OrderingResult {
        self.order
    }

    /// Serializes the response as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::Wire`] if serialization fails.
    pub fn to_json(&self) -> Result<String, MosaicError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parses an ordering response body.
///
/// # Errors
///
/// Returns [`MosaicError::Wire`] for malformed bodies; callers degrade to
/// the fallback order.
pub fn decode_response(body: &str) -> Result<OrderingResponse, MosaicError> {
    Ok(serde_json::from_str(body)?)
}

/// A collection as supplied by the gallery application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPayload {
    collection_id: CollectionId,
    #[serde(default)]
    items: Vec<Item>,
}

impl CollectionPayload {
    pub fn new(collection_id: CollectionId, items: Vec<Item>) -> Self {
        Self {
            collection_id,
            items,
        }
    }

    pub fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Parses a collection payload.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::Wire`] if the JSON is malformed.
    pub fn from_json(body: &str) -> Result<Self, MosaicError> {
        Ok(serde_json::from_str(body)?)
    }
}
