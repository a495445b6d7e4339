// Cache store for API responses.
// In-memory map with lazy TTL checks, optionally mirrored to a disk cache.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::disk::DiskCache;
use super::key::CacheKey;

/// A cached response with its insertion metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: CacheKey,
    /// The raw response payload.
    pub value: Value,
    /// When the entry was stored.
    pub stored_at: DateTime<Utc>,
    /// Lifetime in seconds, counted from `stored_at`.
    pub ttl_secs: u64,
}

impl CacheEntry {
    pub fn new(key: CacheKey, value: Value, stored_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            key,
            value,
            stored_at,
            ttl_secs: ttl.as_secs(),
        }
    }

    /// Valid iff `now - stored_at < ttl`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let ttl = i64::try_from(self.ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);

        now.signed_duration_since(self.stored_at) < ttl
    }
}

/// Response cache shared by every card rendered during one build.
///
/// Lookups never fetch: on a miss the caller fetches and calls [`put`](Self::put).
/// There is no per-key exclusion, so two concurrent misses on the same key
/// both fetch and the later `put` wins.
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    disk: Option<DiskCache>,
    clock: Arc<dyn Clock>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache {
    /// Memory-only cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            disk: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Mirror every `put` to the given disk cache.
    pub fn with_disk(mut self, disk: DiskCache) -> Self {
        self.disk = Some(disk);
        self
    }

    /// Use a different time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the cache for a site root, hydrating from disk when `persist` is set.
    pub fn open(root: &Path, persist: bool) -> Self {
        Self::open_with_clock(root, persist, Arc::new(SystemClock))
    }

    pub fn open_with_clock(root: &Path, persist: bool, clock: Arc<dyn Clock>) -> Self {
        let mut cache = Self::new().with_clock(clock);
        if persist {
            cache = cache.with_disk(DiskCache::for_root(root));
            cache.hydrate();
        }
        cache
    }

    pub fn disk(&self) -> Option<&DiskCache> {
        self.disk.as_ref()
    }

    /// Load unexpired durable records into memory. Returns how many were loaded.
    pub fn hydrate(&self) -> usize {
        let Some(disk) = &self.disk else {
            return 0;
        };

        let loaded = disk.load_all(self.clock.now());
        let count = loaded.len();

        let mut entries = self.entries.lock();
        for entry in loaded {
            entries.insert(entry.key.clone(), entry);
        }

        debug!(count, dir = %disk.dir().display(), "hydrated response cache");
        count
    }

    /// The stored value, if present and not expired.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let now = self.clock.now();
        let entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_valid_at(now) => Some(entry.value.clone()),
            _ => None,
        }
    }

    /// Insert or overwrite the entry for `key`, stamped with the current time.
    pub fn put(&self, key: CacheKey, value: Value, ttl: Duration) {
        let entry = CacheEntry::new(key, value, self.clock.now(), ttl);

        if let Some(disk) = &self.disk {
            disk.save(&entry);
        }

        self.entries.lock().insert(entry.key.clone(), entry);
    }

    /// Drop every in-memory entry. Durable records are left in place.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of in-memory entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
