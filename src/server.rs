//! HTTP server initialization and runtime setup.
//!
//! Handles cache setup, upstream client construction, and Axum server lifecycle.

use crate::application::services::CepService;
use crate::config::Config;
use crate::infrastructure::cache::{CacheService, InMemoryCache, RedisCache};
use crate::infrastructure::upstream::ViaCepClient;
use crate::routes::{RouterOptions, app_router};
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis cache (or in-memory fallback)
/// - ViaCEP client
/// - Axum HTTP server with graceful shutdown on Ctrl-C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(
        state,
        RouterOptions {
            rate_limit_per_minute: config.rate_limit_per_minute,
            behind_proxy: config.behind_proxy,
        },
    )?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wires the cache, upstream client and lookup service together.
///
/// # Errors
///
/// Returns an error if the ViaCEP client cannot be created.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let cache = connect_cache(config).await;

    let provider = Arc::new(
        ViaCepClient::new(config.viacep_base_url.clone(), config.upstream_timeout())
            .context("Failed to create ViaCEP client")?,
    );

    let cep_service = Arc::new(CepService::new(
        cache.clone(),
        provider,
        config.cache_ttl(),
    ));

    Ok(AppState::new(cep_service, cache))
}

/// Connects to Redis when configured, falling back to the in-memory cache.
async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-memory cache.", e);
            }
        }
    } else {
        tracing::info!("Cache enabled (in-memory)");
    }

    Arc::new(InMemoryCache::new(config.cache_max_entries))
}

/// Resolves when the process receives Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
