//! Cache module for storing fetched discovery payloads in memory
//!
//! This module provides a bounded, thread-safe revalidation cache keyed by
//! lookup URL. Entries carry the validators (`ETag`, `Last-Modified`) needed
//! for conditional requests, and the least-recently-used entry is evicted
//! once capacity is exceeded. Staleness is handled entirely by server-driven
//! revalidation, so there is no TTL or invalidation API.

mod revalidation;

pub use revalidation::{CacheEntry, RevalidationCache};
