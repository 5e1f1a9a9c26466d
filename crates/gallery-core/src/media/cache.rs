//! Bounded in-memory cache of decoded images.
//!
//! Entries are kept in recency order; a read or a write moves an entry to
//! the most-recent end. When either the entry-count budget or the byte-cost
//! budget is exceeded, entries are evicted from the least-recent end until
//! both budgets hold again.

use super::decode::DecodedImage;
use crate::config::{GalleryConfig, ImageCacheConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// A cached image and the cost it was stored with.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub image: DecodedImage,
    pub cost_bytes: u64,
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub total_cost_bytes: u64,
    pub max_entries: usize,
    pub max_cost_bytes: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Default)]
struct CacheInner {
    /// Front is least recently used.
    entries: IndexMap<String, CacheEntry>,
    total_cost_bytes: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl CacheInner {
    fn touch(&mut self, key: &str) -> Option<&CacheEntry> {
        let entry = self.entries.shift_remove(key)?;
        self.entries.insert(key.to_string(), entry);
        self.entries.last().map(|(_, entry)| entry)
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.shift_remove(key)?;
        self.total_cost_bytes -= entry.cost_bytes;
        Some(entry)
    }
}

/// Thread-safe LRU image cache with count and cost budgets.
///
/// Construct one per application and share it behind an `Arc`.
pub struct ImageCache {
    inner: Mutex<CacheInner>,
    max_entries: usize,
    max_cost_bytes: u64,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(ImageCacheConfig::MAX_ENTRIES, ImageCacheConfig::MAX_COST_BYTES)
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("max_entries", &self.max_entries)
            .field("max_cost_bytes", &self.max_cost_bytes)
            .finish_non_exhaustive()
    }
}

impl ImageCache {
    pub fn new(max_entries: usize, max_cost_bytes: u64) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            max_entries,
            max_cost_bytes,
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(config.cache_max_entries, config.cache_max_cost_bytes)
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // Every mutation leaves the map consistent, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `key`, marking it as most recently used on a hit.
    pub fn get(&self, key: &str) -> Option<DecodedImage> {
        let mut inner = self.lock();
        let image = inner.touch(key).map(|entry| entry.image.clone());
        match image {
            Some(image) => {
                inner.hits += 1;
                Some(image)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Whether `key` is cached. Does not affect recency.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Insert or replace `key`, then evict until both budgets hold.
    ///
    /// An image whose own cost exceeds the byte budget is not retained.
    pub fn put(&self, key: impl Into<String>, image: DecodedImage, cost_bytes: u64) {
        let key = key.into();
        let mut inner = self.lock();

        if let Some(existing) = inner.entries.get(&key) {
            if existing.cost_bytes == cost_bytes && existing.image == image {
                inner.touch(&key);
                return;
            }
        }
        inner.remove(&key);

        if cost_bytes > self.max_cost_bytes {
            debug!(
                "Not caching {}: cost {} exceeds budget {}",
                key, cost_bytes, self.max_cost_bytes
            );
            return;
        }

        inner.total_cost_bytes += cost_bytes;
        inner.entries.insert(key, CacheEntry { image, cost_bytes });
        self.evict(&mut inner);
    }

    fn evict(&self, inner: &mut CacheInner) {
        while inner.entries.len() > self.max_entries || inner.total_cost_bytes > self.max_cost_bytes
        {
            let Some((key, entry)) = inner.entries.shift_remove_index(0) else {
                break;
            };
            inner.total_cost_bytes -= entry.cost_bytes;
            inner.evictions += 1;
            debug!("Evicted {} ({} bytes) from image cache", key, entry.cost_bytes);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_cost_bytes(&self) -> u64 {
        self.lock().total_cost_bytes
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            entries: inner.entries.len(),
            total_cost_bytes: inner.total_cost_bytes,
            max_entries: self.max_entries,
            max_cost_bytes: self.max_cost_bytes,
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
        }
    }
}
