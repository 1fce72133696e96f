//! Redis cache store.

use super::{CacheError, CacheStore};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::info;

/// Cache store backed by a Redis server.
///
/// The connection manager reconnects on its own; individual command
/// failures are still reported so the wrapper can switch caching off.
#[derive(Clone)]
pub struct RedisCacheStore {
    client: ConnectionManager,
}

impl RedisCacheStore {
    /// Connects to Redis.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the server is unreachable.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let connection = client.get_connection_manager().await?;
        info!("Redis connection established");
        Ok(Self { client: connection })
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn flush(&self) -> Result<(), CacheError> {
        let mut conn = self.client.clone();
        let (): () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.client.clone();
        let (): () = conn.set(key, value).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
