//! Per-collection ordering cache.
//!
//! Each collection key owns a single slot holding the latest fingerprint and
//! its [`OrderingResult`]. Slots live in an LRU map; the map lock is held only
//! long enough to fetch or create a slot, and the computation itself runs
//! under the slot's own lock. Concurrent callers for the same key therefore
//! serialize, and the second one observes the first one's result, while
//! callers for other keys proceed independently.

use std::{
    num::NonZeroUsize,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use log::{debug, trace};
use lru::LruCache;
use time::OffsetDateTime;

use mosaic_core::{fingerprint::Fingerprint, identifier::CollectionId, ordering::OrderingResult};

use crate::config::CacheConfig;

type Slot = Arc<Mutex<Option<CachedOrdering>>>;

#[derive(Debug, Clone)]
struct CachedOrdering {
    fingerprint: Fingerprint,
    result: Arc<OrderingResult>,
    computed_at: OffsetDateTime,
    compute_duration: Duration,
}

/// The outcome of [`OrderingCache::get_or_compute`].
#[derive(Debug, Clone)]
pub struct CacheLookup {
    result: Arc<OrderingResult>,
    fingerprint: Fingerprint,
    from_cache: bool,
    computed_at: OffsetDateTime,
    compute_duration: Duration,
}

impl CacheLookup {
    fn new(entry: &CachedOrdering, from_cache: bool) -> Self {
        Self {
            result: Arc::clone(&entry.result),
            fingerprint: entry.fingerprint.clone(),
            from_cache,
            computed_at: entry.computed_at,
            compute_duration: entry.compute_duration,
        }
    }

    pub fn result(&self) -> &OrderingResult {
        &self.result
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Returns `true` if no computation ran for this lookup.
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    /// When the cached result was originally computed.
    pub fn computed_at(&self) -> OffsetDateTime {
        self.computed_at
    }

    /// How long the original computation took.
    pub fn compute_duration(&self) -> Duration {
        self.compute_duration
    }
}

/// Cache hit/miss counters and occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, `0.0` with no lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Memoizes ordering results per collection, keyed by fingerprint.
#[derive(Debug)]
pub struct OrderingCache {
    slots: Mutex<LruCache<CollectionId, Slot>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for OrderingCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl OrderingCache {
    /// Creates a cache holding at most `config.capacity()` collections.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(config: &CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity()).unwrap_or(NonZeroUsize::MIN);
        Self {
            slots: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the cached result for `key` if it was computed for
    /// `fingerprint`, otherwise runs `compute` and stores its result.
    ///
    /// `compute` runs at most once per `(key, fingerprint)` as long as the
    /// key is not evicted in between. A different fingerprint replaces the
    /// slot's previous entry.
    pub fn get_or_compute<F>(
        &self,
        key: CollectionId,
        fingerprint: &Fingerprint,
        compute: F,
    ) -> CacheLookup
    where
        F: FnOnce() -> OrderingResult,
    {
        let slot = self.slot(key);
        let mut entry = lock(&slot);

        if let Some(cached) = entry.as_ref().filter(|c| &c.fingerprint == fingerprint) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(
                collection = key.get(),
                fingerprint = fingerprint.as_str();
                "Ordering cache hit"
            );
            return CacheLookup::new(cached, true);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        if let Some(stale) = entry.as_ref() {
            debug!(
                collection = key.get(),
                old = stale.fingerprint.as_str(),
                new = fingerprint.as_str();
                "Collection changed, recomputing ordering"
            );
        }

        let started = Instant::now();
        let result = compute();
        let cached = CachedOrdering {
            fingerprint: fingerprint.clone(),
            result: Arc::new(result),
            computed_at: OffsetDateTime::now_utc(),
            compute_duration: started.elapsed(),
        };
        let lookup = CacheLookup::new(&cached, false);
        *entry = Some(cached);
        lookup
    }

    /// Drops the slot for `key`. Returns `true` if one existed.
    pub fn invalidate(&self, key: CollectionId) -> bool {
        lock(&self.slots).pop(&key).is_some()
    }

    /// Number of collections currently held.
    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let slots = lock(&self.slots);
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: slots.len(),
            capacity: slots.cap().get(),
        }
    }

    /// Fetches or creates the slot for `key`, holding the map lock only briefly.
    fn slot(&self, key: CollectionId) -> Slot {
        let mut slots = lock(&self.slots);
        if let Some(slot) = slots.get(&key) {
            return Arc::clone(slot);
        }
        let slot: Slot = Arc::new(Mutex::new(None));
        if let Some((evicted, _)) = slots.push(key, Arc::clone(&slot)) {
            trace!(collection = evicted.get(); "Evicted ordering cache slot");
        }
        slot
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
