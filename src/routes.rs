//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /cep/{cep}`      - Postal code lookup (rate limited)
//! - `GET /api/cep/{cep}`  - Same lookup under the `/api` prefix (shares the limiter)
//! - `GET /health`         - Health check: cache backend (not rate limited)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use anyhow::Result;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Router settings that come from configuration.
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// Lookups allowed per client per minute.
    pub rate_limit_per_minute: u32,
    /// When `true`, rate limiting reads client IP from `X-Forwarded-For` /
    /// `X-Real-IP` headers instead of the peer socket address; enable only when
    /// the service runs behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 10,
            behind_proxy: false,
        }
    }
}

/// Builds the router with all routes and middleware, without path normalization.
///
/// The rate limiter identifies clients through `ConnectInfo<SocketAddr>`, so the
/// router must be served with `into_make_service_with_connect_info`.
///
/// # Errors
///
/// Returns an error if the rate limit is zero.
pub fn build_router(state: AppState, options: RouterOptions) -> Result<Router> {
    let lookups = api::routes::cep_routes();

    let limited = Router::new()
        .merge(lookups.clone())
        .nest("/api", lookups)
        .layer(rate_limit::layer(
            options.rate_limit_per_minute,
            options.behind_proxy,
        )?);

    Ok(Router::new()
        .merge(limited)
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer()))
}

/// Constructs the application router, trimming trailing slashes before routing.
///
/// # Errors
///
/// See [`build_router`].
pub fn app_router(state: AppState, options: RouterOptions) -> Result<NormalizePath<Router>> {
    let router = build_router(state, options)?;
    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
