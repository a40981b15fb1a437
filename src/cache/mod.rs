//! In-process object cache behind an injected trait.
//!
//! Cache failures are never surfaced to callers: `get` answers `None` for
//! anything it cannot produce and `set` is best-effort. Callers treat a
//! missing value as a cache miss and recompute.

use moka::sync::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

pub trait ObjectCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String, ttl: Duration);
}

#[derive(Clone)]
struct Entry {
    payload: String,
    ttl: Duration,
}

struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

pub struct MemoryCache {
    cache: Cache<String, Entry>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        MemoryCache { cache }
    }
}

impl ObjectCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).map(|entry| entry.payload)
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        self.cache.insert(
            key.to_string(),
            Entry {
                payload: value,
                ttl,
            },
        );
    }
}

/// Used when caching is disabled: every read misses, every write is dropped.
pub struct NoopCache;

impl ObjectCache for NoopCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: String, _ttl: Duration) {}
}
