//! Process-local TTL cache.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory cache used when Redis is not configured, and in tests.
///
/// Expired entries are never returned. They are swept when the cache reaches
/// `max_entries`; if it is still full afterwards, the entry closest to expiry
/// is evicted.
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl InMemoryCache {
    /// Creates an empty cache holding at most `max_entries` values.
    pub fn new(max_entries: usize) -> Self {
        debug!(max_entries, "Using in-memory cache");
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn make_room(entries: &mut HashMap<String, CacheEntry>, max_entries: usize) {
        if entries.len() < max_entries {
            return;
        }

        let now = Instant::now();
        entries.retain(|_, e| !e.is_expired(now));

        if entries.len() >= max_entries
            && let Some(victim) = entries
                .iter()
                .min_by_key(|(_, e)| e.expires_at)
                .map(|(k, _)| k.clone())
        {
            entries.remove(&victim);
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let entries = self.entries.read();
        let value = entries
            .get(key)
            .filter(|e| !e.is_expired(Instant::now()))
            .map(|e| e.value.clone());
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let expires_at = Instant::now().checked_add(ttl).ok_or_else(|| {
            CacheError::OperationError(format!("TTL of {}s is out of range", ttl.as_secs()))
        })?;
        let mut entries = self.entries.write();

        if !entries.contains_key(key) {
            Self::make_room(&mut entries, self.max_entries);
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
