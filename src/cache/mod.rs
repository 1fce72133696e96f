//! Response cache sitting in front of route handlers.
//!
//! The cache is decided once at startup. When enabled, the store is flushed
//! before the first request so no entry survives a restart. The first store
//! error switches caching off for the rest of the process; requests are then
//! served by recomputation.
//!
//! Entries never expire. A request without `startTime` resolves its window
//! against the clock, so a cached answer keeps the window of the first call
//! until the store is flushed by a restart.

mod memory;
mod redis_store;

pub use memory::{DEFAULT_MAX_ENTRIES, MemoryCacheStore};
pub use redis_store::RedisCacheStore;

use crate::config::{CacheBackend, CacheConfig, RuntimeSettings};
use crate::error::ApiError;
use crate::format::HandlerOutput;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};

/// Cache store errors. Never surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Redis command or connection failure.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A cached value could not be encoded or decoded.
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused the operation.
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store backing the response cache.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Removes every entry.
    async fn flush(&self) -> Result<(), CacheError>;
    /// Reads an entry.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    /// Writes an entry.
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// Fail-open cache over a [`CacheStore`].
pub struct CacheWrapper {
    store: Arc<dyn CacheStore>,
    enabled: AtomicBool,
}

impl CacheWrapper {
    /// Builds the cache described by configuration, or `None` when caching
    /// is off or the store cannot be reached.
    pub async fn from_config(config: &CacheConfig, settings: RuntimeSettings) -> Option<Self> {
        if !settings.cache_allowed {
            info!("Caching disabled from the command line");
            return None;
        }
        if !config.enabled {
            info!("Caching disabled by configuration");
            return None;
        }

        let store: Arc<dyn CacheStore> = match config.backend {
            CacheBackend::Memory => Arc::new(MemoryCacheStore::with_capacity(
                config.max_entries.unwrap_or(DEFAULT_MAX_ENTRIES),
            )),
            CacheBackend::Redis => {
                let Some(url) = config.redis_url() else {
                    error!("Redis port and host are required; caching disabled");
                    return None;
                };
                match RedisCacheStore::connect(&url).await {
                    Ok(store) => Arc::new(store),
                    Err(err) => {
                        error!("Redis - {}; caching disabled", err);
                        return None;
                    }
                }
            }
        };

        Self::start(store).await
    }

    /// Flushes the store and wraps it. Returns `None` if the flush fails.
    pub async fn start(store: Arc<dyn CacheStore>) -> Option<Self> {
        if let Err(err) = store.flush().await {
            error!("{} - {}; caching disabled", store.name(), err);
            return None;
        }

        info!("Response cache enabled ({}), store flushed", store.name());
        Some(Self {
            store,
            enabled: AtomicBool::new(true),
        })
    }

    /// Whether reads and writes still reach the store.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Cache key for a route invocation.
    ///
    /// `params` should hold only the parameters the route reads. Object keys
    /// serialize in sorted order, so equal parameters give equal keys.
    #[must_use]
    pub fn key(route: &str, params: &Value) -> String {
        format!("{}:{}", route, params)
    }

    /// Returns the cached output for `key`, if any.
    pub async fn lookup(&self, key: &str) -> Option<HandlerOutput> {
        if !self.is_enabled() {
            return None;
        }

        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(err) => {
                self.disable(&err);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(output) => Some(output),
            Err(err) => {
                self.disable(&err.into());
                None
            }
        }
    }

    /// Stores a successful output.
    pub async fn store(&self, key: &str, output: &HandlerOutput) {
        if !self.is_enabled() {
            return;
        }

        let result = match serde_json::to_string(output) {
            Ok(raw) => self.store.set(key, &raw).await,
            Err(err) => Err(err.into()),
        };

        if let Err(err) = result {
            self.disable(&err);
        }
    }

    /// Serves `key` from the cache or computes and stores it.
    ///
    /// Errors from `compute` are returned as-is and never cached.
    ///
    /// # Errors
    /// Returns whatever `compute` returns on failure.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        compute: F,
    ) -> Result<HandlerOutput, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<HandlerOutput, ApiError>>,
    {
        if let Some(hit) = self.lookup(key).await {
            debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        let output = compute().await?;
        self.store(key, &output).await;
        Ok(output)
    }

    fn disable(&self, err: &CacheError) {
        if self.enabled.swap(false, Ordering::AcqRel) {
            error!("{} - {}; caching disabled", self.store.name(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    struct BrokenStore {
        flush_ok: bool,
        gets: AtomicUsize,
    }

    impl BrokenStore {
        fn new(flush_ok: bool) -> Self {
            Self {
                flush_ok,
                gets: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn flush(&self) -> Result<(), CacheError> {
            if self.flush_ok {
                Ok(())
            } else {
                Err(CacheError::Unavailable("connection refused".to_string()))
            }
        }

        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            Err(CacheError::Unavailable("connection reset".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection reset".to_string()))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    fn output(text: &str) -> HandlerOutput {
        HandlerOutput::Text(text.to_string())
    }

    #[tokio::test]
    async fn test_cold_start_flushes_store() {
        let store = Arc::new(MemoryCacheStore::new());
        store.set("marketmakers:{}", "stale").await.unwrap();

        let cache = CacheWrapper::start(store.clone()).await.unwrap();

        assert!(cache.lookup("marketmakers:{}").await.is_none());
        assert!(store.get("marketmakers:{}").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_or_compute_caches_success() {
        let cache = CacheWrapper::start(Arc::new(MemoryCacheStore::new()))
            .await
            .unwrap();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let result = cache
                .get_or_compute("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(output("v"))
                })
                .await
                .unwrap();
            assert_eq!(result, output("v"));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = CacheWrapper::start(Arc::new(MemoryCacheStore::new()))
            .await
            .unwrap();

        let first = cache
            .get_or_compute("k", || async {
                Err(ApiError::SubQueryFailure("down".to_string()))
            })
            .await;
        assert!(first.is_err());

        let second = cache
            .get_or_compute("k", || async { Ok(output("fresh")) })
            .await
            .unwrap();
        assert_eq!(second, output("fresh"));
    }

    #[tokio::test]
    async fn test_failed_flush_leaves_cache_off() {
        assert!(CacheWrapper::start(Arc::new(BrokenStore::new(false))).await.is_none());
    }

    #[tokio::test]
    async fn test_store_error_disables_cache() {
        let store = Arc::new(BrokenStore::new(true));
        let cache = CacheWrapper::start(store.clone()).await.unwrap();

        let result = cache
            .get_or_compute("k", || async { Ok(output("computed")) })
            .await
            .unwrap();
        assert_eq!(result, output("computed"));
        assert!(!cache.is_enabled());

        let again = cache
            .get_or_compute("k", || async { Ok(output("computed again")) })
            .await
            .unwrap();
        assert_eq!(again, output("computed again"));
        assert_eq!(store.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_corrupt_entry_disables_cache() {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = CacheWrapper::start(store.clone()).await.unwrap();
        store.set("k", "not json").await.unwrap();

        assert!(cache.lookup("k").await.is_none());
        assert!(!cache.is_enabled());
    }

    #[test]
    fn test_key_is_canonical() {
        let a = CacheWrapper::key("marketmakers", &json!({"range": "7d", "format": "csv"}));
        let b = CacheWrapper::key("marketmakers", &json!({"format": "csv", "range": "7d"}));
        assert_eq!(a, b);
        assert!(a.starts_with("marketmakers:"));
    }

    #[tokio::test]
    async fn test_disabled_from_command_line() {
        let config = CacheConfig {
            enabled: true,
            backend: CacheBackend::Memory,
            ..Default::default()
        };
        let settings = RuntimeSettings {
            debug: false,
            cache_allowed: false,
        };
        assert!(CacheWrapper::from_config(&config, settings).await.is_none());
    }

    #[tokio::test]
    async fn test_redis_without_host_is_disabled() {
        let config = CacheConfig {
            enabled: true,
            backend: CacheBackend::Redis,
            port: Some(6379),
            ..Default::default()
        };
        let settings = RuntimeSettings {
            debug: false,
            cache_allowed: true,
        };
        assert!(CacheWrapper::from_config(&config, settings).await.is_none());
    }

    #[tokio::test]
    async fn test_memory_backend_from_config() {
        let config = CacheConfig {
            enabled: true,
            backend: CacheBackend::Memory,
            ..Default::default()
        };
        let settings = RuntimeSettings {
            debug: false,
            cache_allowed: true,
        };
        let cache = CacheWrapper::from_config(&config, settings).await.unwrap();
        assert!(cache.is_enabled());
    }
}
