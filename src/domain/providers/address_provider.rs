//! Provider trait for raw postal code lookups.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Raw JSON object returned by an upstream lookup, before normalization.
pub type UpstreamPayload = Map<String, Value>;

/// Failures reported by an [`AddressProvider`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream answered, and the postal code does not exist.
    #[error("postal code not found upstream")]
    NotFound,

    /// The request did not complete within the configured timeout.
    #[error("upstream request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The upstream could not be reached.
    #[error("upstream transport error: {0}")]
    Transport(String),

    /// The upstream answered successfully but the body was not a JSON object.
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

/// Interface to an external postal code lookup API.
///
/// # Implementations
///
/// - [`crate::infrastructure::upstream::ViaCepClient`] - ViaCEP over HTTPS
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressProvider: Send + Sync {
    /// Fetches the raw payload for an already validated postal code.
    ///
    /// Exactly one upstream request is made per call; there are no retries.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::NotFound`] if the upstream reports the code as unknown
    /// - [`UpstreamError::Timeout`] / [`UpstreamError::Transport`] if the request fails
    /// - [`UpstreamError::Malformed`] if the response cannot be understood
    async fn fetch(&self, cep: &str) -> Result<UpstreamPayload, UpstreamError>;
}
