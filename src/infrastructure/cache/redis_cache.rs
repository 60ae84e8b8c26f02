//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Redis cache shared by every instance of the service.
///
/// Uses `ConnectionManager` for connection reuse and automatic reconnects.
/// Errors are returned to the caller, which decides whether to degrade.
pub struct RedisCache {
    client: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self { client: manager })
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();

        let value = conn
            .get::<_, Option<String>>(key)
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {}: {}", key, e)))?;

        debug!(key, hit = value.is_some(), "Redis GET");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.client.clone();
        // SETEX rejects a zero expiry
        let ttl_seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(|e| CacheError::OperationError(format!("SETEX {}: {}", key, e)))?;

        debug!(key, ttl_seconds, "Redis SET");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
