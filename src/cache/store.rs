//! Cache Store Module
//!
//! TTL-bounded response cache with optional write-through to disk.
//!
//! The cache is an optimization, never a correctness dependency: no
//! operation here returns an error. Disk and JSON failures are logged and
//! read as a miss (or ignored, for writes).

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{disk, CacheEntry, CacheStats};
use crate::config::CacheConfig;

// == Response Cache ==
/// In-memory response cache keyed by request signature.
#[derive(Debug)]
pub struct ResponseCache {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Settings captured at construction
    config: CacheConfig,
}

impl ResponseCache {
    // == Constructor ==
    /// Creates an empty cache. Configuration is read once, here.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            config,
        }
    }

    fn ttl_ms(&self) -> u64 {
        self.config.ttl_seconds.saturating_mul(1000)
    }

    fn persistent(&self) -> bool {
        self.config.enabled && self.config.persistence_enabled
    }

    // == Get ==
    /// Retrieves a cached value.
    ///
    /// Returns `None` when the cache is disabled, the key is unknown, or the
    /// entry has expired. Expired entries are deleted from memory and disk.
    /// A memory miss falls back to disk when persistence is enabled; a fresh
    /// disk entry is promoted into memory.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        if !self.config.enabled {
            return None;
        }

        match self.lookup(key) {
            Some((value, from_disk)) => {
                self.stats.record_hit();
                if from_disk {
                    self.stats.record_disk_load();
                }
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores a value stamped with the current time, replacing any prior entry.
    ///
    /// No-op when disabled. With persistence enabled the entry is also
    /// written to disk; a failed write is logged and otherwise ignored.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        if !self.config.enabled {
            return;
        }

        let key = key.into();
        let entry = CacheEntry::new(value);

        if self.persistent() {
            if let Err(e) = disk::write_entry(&self.config.cache_dir, &key, &entry) {
                warn!("Failed to persist cache entry '{}': {}", key, e);
            }
        }

        self.entries.insert(key, entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Has ==
    /// True iff the cache is enabled and holds a fresh entry for `key`,
    /// in memory or (with persistence) on disk.
    pub fn has(&mut self, key: &str) -> bool {
        self.config.enabled && self.lookup(key).is_some()
    }

    // == Is Expired ==
    /// True when no in-memory entry exists or the entry is past its TTL.
    ///
    /// Only memory is consulted; an entry that lives solely on disk reads as expired.
    pub fn is_expired(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map_or(true, |entry| entry.is_expired(self.ttl_ms()))
    }

    // == Clear ==
    /// Drops every entry, and every cache file when persistence is enabled.
    ///
    /// Returns the number of in-memory entries dropped.
    pub fn clear(&mut self) -> usize {
        let cleared = self.entries.len();
        self.entries.clear();
        self.stats.set_total_entries(0);

        if self.persistent() {
            match disk::clear_dir(&self.config.cache_dir) {
                Ok(files) => debug!("Cache clear: removed {} files", files),
                Err(e) => warn!("Cache clear: failed to remove cache files: {}", e),
            }
        }

        cleared
    }

    // == Cleanup Expired ==
    /// Removes expired entries from memory and stale files from disk.
    ///
    /// Disk staleness is judged by file modification time. Returns the total
    /// number of entries and files removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let ttl_ms = self.ttl_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(ttl_ms));
        let mut removed = before - self.entries.len();

        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());

        if self.persistent() {
            match disk::sweep_stale(&self.config.cache_dir, Duration::from_millis(ttl_ms)) {
                Ok(files) => removed += files,
                Err(e) => warn!("Cache sweep: failed to scan cache directory: {}", e),
            }
        }

        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of in-memory entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds a fresh value for `key`, flagging whether it came from disk.
    fn lookup(&mut self, key: &str) -> Option<(Value, bool)> {
        let ttl_ms = self.ttl_ms();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(ttl_ms) {
                return Some((entry.data.clone(), false));
            }
            self.entries.remove(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_expirations(1);
            self.forget_on_disk(key);
            return None;
        }

        if !self.persistent() {
            return None;
        }

        match disk::read_entry(&self.config.cache_dir, key) {
            Ok(Some(entry)) if !entry.is_expired(ttl_ms) => {
                let value = entry.data.clone();
                self.entries.insert(key.to_string(), entry);
                self.stats.set_total_entries(self.entries.len());
                debug!("Rehydrated cache entry '{}' from disk", key);
                Some((value, true))
            }
            Ok(Some(_)) => {
                self.stats.record_expirations(1);
                self.forget_on_disk(key);
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring unreadable cache file for '{}': {}", key, e);
                None
            }
        }
    }

    fn forget_on_disk(&self, key: &str) {
        if !self.persistent() {
            return;
        }
        if let Err(e) = disk::remove_entry(&self.config.cache_dir, key) {
            warn!("Failed to remove cache file for '{}': {}", key, e);
        }
    }
}
