//! In-process cache store.

use super::{CacheError, CacheStore};
use async_trait::async_trait;
use dashmap::DashMap;

/// Entry limit used when the configuration sets none.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Cache store kept in process memory.
///
/// Holds at most `max_entries` values. Writing a new key into a full store
/// evicts an arbitrary entry first.
#[derive(Debug)]
pub struct MemoryCacheStore {
    entries: DashMap<String, String>,
    max_entries: usize,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheStore {
    /// Creates an empty store with the default entry limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Creates an empty store holding at most `max_entries` values.
    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_one(&self) {
        // The iterator guard must be released before removing.
        let victim = self.entries.iter().next().map(|entry| entry.key().clone());
        if let Some(victim) = victim {
            self.entries.remove(&victim);
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn flush(&self) -> Result<(), CacheError> {
        self.entries.clear();
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        while !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            self.evict_one();
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
