//! Postal code lookup service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::domain::cep::cache_key;
use crate::domain::entities::AddressRecord;
use crate::domain::providers::{AddressProvider, UpstreamError};
use crate::infrastructure::cache::CacheService;

/// Message returned to clients when a postal code does not exist.
pub const NOT_FOUND_MESSAGE: &str = "CEP não encontrado.";

/// Failures of [`CepService::lookup`].
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("CEP não encontrado.")]
    NotFound,

    #[error("Erro ao se conectar à API do ViaCEP: {0}")]
    Transport(String),
}

impl From<UpstreamError> for LookupError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::NotFound => LookupError::NotFound,
            other => LookupError::Transport(other.to_string()),
        }
    }
}

/// Resolves postal codes through a short-lived cache in front of an upstream provider.
///
/// # Lookup Flow
///
/// 1. Read `cep:{cep}` from the cache; a hit is returned as-is (the TTL is not refreshed)
/// 2. On a miss, query the provider exactly once
/// 3. Normalize the payload into an [`AddressRecord`]
/// 4. Store the record under the same key for `cache_ttl`
///
/// Not-found results are never cached. Cache failures are logged and never fail a lookup.
pub struct CepService {
    cache: Arc<dyn CacheService>,
    provider: Arc<dyn AddressProvider>,
    cache_ttl: Duration,
}

impl CepService {
    /// Lifetime of a cached address.
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

    /// Creates a new lookup service.
    pub fn new(
        cache: Arc<dyn CacheService>,
        provider: Arc<dyn AddressProvider>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            provider,
            cache_ttl,
        }
    }

    /// Looks up the address for a validated 8-digit postal code.
    ///
    /// # Errors
    ///
    /// - [`LookupError::NotFound`] if the upstream does not know the code
    /// - [`LookupError::Transport`] if the upstream is unreachable, times out, or
    ///   answers with something that cannot be parsed
    pub async fn lookup(&self, cep: &str) -> Result<AddressRecord, LookupError> {
        let key = cache_key(cep);

        if let Some(record) = self.cached(&key).await {
            metrics::counter!("cep_lookups_total", "outcome" => "cache_hit").increment(1);
            return Ok(record);
        }

        let payload = match self.provider.fetch(cep).await {
            Ok(payload) => payload,
            Err(e) => {
                let err = LookupError::from(e);
                let outcome = match err {
                    LookupError::NotFound => "not_found",
                    LookupError::Transport(_) => "upstream_error",
                };
                metrics::counter!("cep_lookups_total", "outcome" => outcome).increment(1);
                return Err(err);
            }
        };

        let record = AddressRecord::from_map(&payload);
        self.store(&key, &record).await;

        metrics::counter!("cep_lookups_total", "outcome" => "upstream").increment(1);
        Ok(record)
    }

    async fn cached(&self, key: &str) -> Option<AddressRecord> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Map<String, Value>>(&raw) {
                Ok(map) => {
                    debug!("Cache HIT for {}", key);
                    Some(AddressRecord::from_map(&map))
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => {
                debug!("Cache MISS for {}", key);
                None
            }
            Err(e) => {
                error!("Cache error: {}", e);
                None
            }
        }
    }

    async fn store(&self, key: &str, record: &AddressRecord) {
        let raw = Value::Object(record.to_map()).to_string();

        if let Err(e) = self.cache.set(key, &raw, self.cache_ttl).await {
            warn!("Failed to cache {}: {}", key, e);
        }
    }
}
