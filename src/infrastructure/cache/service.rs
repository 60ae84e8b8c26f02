//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value store with per-entry expiry.
///
/// Values are opaque strings; callers decide the encoding. Implementations must be
/// safe to share between concurrent requests.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache
/// - [`crate::infrastructure::cache::InMemoryCache`] - Process-local cache
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on cache hit
    /// - `Ok(None)` on cache miss or expired entry
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend cannot be queried. Callers treat this
    /// as a miss.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a value that expires `ttl` after this call.
    ///
    /// Overwrites any existing entry and its expiry.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend rejects the write or `ttl` cannot be
    /// represented as an expiry.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health reports.
    fn backend(&self) -> &'static str;
}
