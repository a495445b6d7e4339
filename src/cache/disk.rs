// Disk persistence for the response cache.
// One JSON record per key; write failures and bad records are logged, never fatal.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;

use super::key::CacheKey;
use super::paths;
use super::store::CacheEntry;

/// On-disk shape of a cache entry. The key lives in the filename.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord<V> {
    value: V,
    stored_at: DateTime<Utc>,
    ttl_seconds: u64,
}

/// Durable mirror of cache entries under a single directory.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Disk cache in an explicit directory. Nothing is created until the first save.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Disk cache at the fixed location under a build root.
    pub fn for_root(root: &Path) -> Self {
        Self::new(paths::cache_dir(root))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist one entry, logging instead of failing.
    pub fn save(&self, entry: &CacheEntry) {
        if let Err(e) = self.try_save(entry) {
            warn!(key = %entry.key, error = %e, "failed to persist cache entry");
        }
    }

    /// Persist one entry, overwriting any previous record for its key.
    pub fn try_save(&self, entry: &CacheEntry) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let record = CacheRecord {
            value: &entry.value,
            stored_at: entry.stored_at,
            ttl_seconds: entry.ttl_secs,
        };
        let json = serde_json::to_string_pretty(&record)?;

        // Write atomically via temp file
        let path = paths::record_path(&self.dir, &entry.key);
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        debug!(key = %entry.key, path = %path.display(), "persisted cache entry");
        Ok(())
    }

    /// Every record still valid at `now`. Unreadable or malformed records are skipped.
    pub fn load_all(&self, now: DateTime<Utc>) -> Vec<CacheEntry> {
        if !self.dir.exists() {
            return Vec::new();
        }

        let dir_entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "failed to read cache directory");
                return Vec::new();
            }
        };

        let mut loaded = Vec::new();
        for dir_entry in dir_entries.flatten() {
            let path = dir_entry.path();
            let Some(key) = paths::key_from_path(&path) else {
                continue;
            };

            match read_record(&path, key) {
                Ok(entry) if entry.is_valid_at(now) => loaded.push(entry),
                Ok(entry) => debug!(key = %entry.key, "skipping expired cache record"),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable cache record"),
            }
        }
        loaded
    }

    /// Delete the cache directory and all records in it.
    pub fn purge(&self) -> Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

fn read_record(path: &Path, key: CacheKey) -> Result<CacheEntry> {
    let contents = fs::read_to_string(path)?;
    let record: CacheRecord<Value> = serde_json::from_str(&contents)?;

    Ok(CacheEntry {
        key,
        value: record.value,
        stored_at: record.stored_at,
        ttl_secs: record.ttl_seconds,
    })
}
