//! Shared data cache.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

/// A cached value and when it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    data: Bytes,
    updated_at: Instant,
}

impl CacheEntry {
    /// Cached data.
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// Consume into the cached data.
    #[must_use]
    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// Time elapsed since the entry was written.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.updated_at.elapsed()
    }
}

/// Thread-safe cache keyed by serialized [`Key`](crate::Key).
///
/// One cache is shared by every scope and hook created from the same
/// [`Swr`](crate::Swr) root.
#[derive(Debug, Default)]
pub struct Cache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl Cache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Store data, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, data: Bytes) {
        let entry = CacheEntry {
            data,
            updated_at: Instant::now(),
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), entry);
    }

    /// Remove an entry, returning it.
    pub fn remove(&self, key: &str) -> Option<CacheEntry> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the cache holds no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
