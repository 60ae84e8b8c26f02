//! Caching layer for address lookups.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`RedisCache`] - Shared Redis-backed cache
//! - [`InMemoryCache`] - Process-local cache, used when Redis is not configured

mod memory_cache;
mod redis_cache;
mod service;

pub use memory_cache::InMemoryCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
