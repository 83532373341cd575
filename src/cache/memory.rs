//! Bounded in-memory movie cache.
//!
//! Entries are `Arc<Movie>`. Sessions retain an entry by holding a clone of its `Arc`; an entry is
//! evictable only while the cache holds the sole reference.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use crate::cache::key::CacheKey;
use crate::model::movie::Movie;

/// Least-recently-used cache of decoded movies.
pub struct MemoryCache {
    capacity: NonZeroUsize,
    entries: LruCache<CacheKey, Arc<Movie>>,
}

impl MemoryCache {
    /// Cache holding up to `capacity` unretained entries; zero reads as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            capacity,
            entries: LruCache::new(capacity),
        }
    }

    /// Look up `key`, marking it most recently used.
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<Movie>> {
        self.entries.get(key).cloned()
    }

    /// Whether `key` is cached, without touching recency.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains(key)
    }

    /// Insert `movie` under `key`.
    ///
    /// At capacity the least recently used unretained entry is evicted. When every entry is
    /// retained the cache grows past its nominal capacity instead.
    pub fn insert(&mut self, key: CacheKey, movie: Arc<Movie>) {
        if !self.entries.contains(&key) && self.entries.len() >= self.entries.cap().get() {
            let victim = self
                .entries
                .iter()
                .rev()
                .find(|(_, m)| Arc::strong_count(m) == 1)
                .map(|(k, _)| k.clone());
            match victim {
                Some(victim) => {
                    tracing::debug!(key = %victim, "evicting unretained movie");
                    self.entries.pop(&victim);
                }
                None => {
                    let grown = self.entries.cap().saturating_add(1);
                    tracing::debug!(cap = grown.get(), "all cached movies retained; growing");
                    self.entries.resize(grown);
                }
            }
        }
        self.entries.put(key, movie);
    }

    /// Remove `key` regardless of retention.
    pub fn remove(&mut self, key: &CacheKey) -> Option<Arc<Movie>> {
        self.entries.pop(key)
    }

    /// Drop every entry no session retains and shrink back toward the nominal capacity.
    ///
    /// Returns how many entries were dropped.
    pub fn sweep(&mut self) -> usize {
        let unretained: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, m)| Arc::strong_count(m) == 1)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &unretained {
            self.entries.pop(key);
        }
        let retained = NonZeroUsize::new(self.entries.len()).unwrap_or(NonZeroUsize::MIN);
        self.entries.resize(self.capacity.max(retained));
        unretained.len()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.entries.resize(self.capacity);
    }

    /// Number of cached movies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current capacity, including growth forced by retained entries.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/memory.rs"]
mod tests;
