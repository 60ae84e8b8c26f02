//! Per-client rate limiting using the token bucket algorithm.

use anyhow::{Context, Result};
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::net::IpAddr;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Identifies the client of a request by IP address.
///
/// Uses the socket peer address, or the `X-Forwarded-For` / `X-Real-IP` /
/// `Forwarded` headers when the service runs behind a trusted reverse proxy.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor {
    behind_proxy: bool,
}

impl ClientIpKeyExtractor {
    pub fn new(behind_proxy: bool) -> Self {
        Self { behind_proxy }
    }
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.behind_proxy {
            SmartIpKeyExtractor.extract(req)
        } else {
            PeerIpKeyExtractor.extract(req)
        }
    }
}

/// Rate limiter layer type applied to lookup routes.
pub type RateLimitLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter allowing `per_minute` requests per client per minute.
///
/// # Limits
///
/// - **Burst**: `per_minute` requests
/// - **Replenish**: one request every `60 / per_minute` seconds
///
/// This is a token bucket, not a fixed window. A client that starts with a full
/// bucket can make up to `2 * per_minute - 1` requests in its first 60 seconds:
/// the burst, plus the requests replenished during that minute. The sustained
/// rate is `per_minute`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Errors
///
/// Returns an error if `per_minute` is zero.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/cep/{cep}", get(cep_handler))
///     .layer(rate_limit::layer(10, false)?);
/// ```
pub fn layer(per_minute: u32, behind_proxy: bool) -> Result<RateLimitLayer> {
    let replenish_ms = (60_000 / u64::from(per_minute.max(1))).max(1);

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(replenish_ms)
            .burst_size(per_minute)
            .key_extractor(ClientIpKeyExtractor::new(behind_proxy))
            .finish()
            .context("Rate limit must allow at least one request per minute")?,
    );

    Ok(GovernorLayer::new(governor_conf))
}
