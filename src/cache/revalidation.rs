//! Bounded LRU cache of fetched payloads and their freshness validators
//!
//! Provides a `RevalidationCache` mapping a fully-qualified lookup URL to the
//! last successfully fetched payload plus the metadata needed to revalidate
//! it (`ETag`, `Last-Modified`). Entries are only ever written after a
//! `200 OK` response and are evicted least-recently-used once the configured
//! capacity is exceeded.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// The last known-good fetch for one lookup URL
///
/// An entry exists only for URLs that have received at least one `200 OK`
/// response. It is read (never mutated) before each request to build the
/// conditional headers, and overwritten wholesale on the next `200 OK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Raw bytes of the last successfully retrieved response body
    pub payload: Vec<u8>,
    /// Opaque validator from the origin's `ETag` header, empty if none
    pub etag: String,
    /// HTTP-date string, echoed from the origin's `Last-Modified` header
    /// or synthesized at fetch time when the origin omitted it
    pub last_modified: String,
}

/// Thread-safe bounded cache keyed by lookup URL
///
/// A cheaply cloneable handle around a shared LRU map. `get` counts as a use
/// for recency purposes, so entries consulted for revalidation stay warm.
/// Concurrent fetches for the same key may both race to populate the cache;
/// the last writer wins, which is acceptable because every writer stored a
/// valid origin state.
#[derive(Debug, Clone)]
pub struct RevalidationCache {
    entries: Arc<Mutex<LruCache<String, CacheEntry>>>,
}

impl RevalidationCache {
    /// Default capacity used by `DiscoveryClient` when none is configured
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// Creates a cache holding at most `capacity` entries
    ///
    /// A zero capacity is clamped to one entry rather than rejected.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Looks up the entry for `key`, refreshing its recency
    ///
    /// Returns `None` on a miss. A poisoned lock also reads as a miss: the
    /// caller falls back to an unconditional fetch, which is always correct.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    /// Stores `entry` under `key`, overwriting any prior entry
    ///
    /// Inserting beyond capacity evicts the least-recently-used key.
    pub fn put(&self, key: String, entry: CacheEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(key, entry);
        }
    }

    /// Number of entries currently cached
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
