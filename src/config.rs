//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Redis
//!
//! Redis is optional. Without it, lookups are cached in process memory.
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! ```
//!
//! or, from individual components:
//!
//! ```bash
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `VIACEP_BASE_URL` - Upstream base URL (default: `https://viacep.com.br`)
//! - `UPSTREAM_TIMEOUT_SECONDS` - Upstream request timeout (default: 5, max: 60)
//! - `CACHE_TTL_SECONDS` - Lifetime of a cached address (default: 300, max: 86400)
//! - `CACHE_MAX_ENTRIES` - Capacity of the in-memory cache (default: 10000)
//! - `RATE_LIMIT_PER_MINUTE` - Lookups allowed per client per minute (default: 10)
//! - `BEHIND_PROXY` - Read client IP from proxy headers (default: `false`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use crate::application::services::CepService;
use crate::infrastructure::upstream::ViaCepClient;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub redis_url: Option<String>,
    pub log_level: String,
    pub log_format: String,
    /// Base URL of the ViaCEP API, without the `/ws/...` path.
    pub viacep_base_url: String,
    pub upstream_timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
    /// Upper bound on entries held by the in-memory cache.
    /// Has no effect when Redis is configured.
    pub cache_max_entries: usize,
    pub rate_limit_per_minute: u32,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            redis_url: None,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            viacep_base_url: ViaCepClient::DEFAULT_BASE_URL.to_string(),
            upstream_timeout_seconds: ViaCepClient::DEFAULT_TIMEOUT.as_secs(),
            cache_ttl_seconds: CepService::DEFAULT_CACHE_TTL.as_secs(),
            cache_max_entries: 10_000,
            rate_limit_per_minute: 10,
            behind_proxy: false,
        }
    }
}

impl Config {
    /// Longest accepted cache TTL, one day.
    pub const MAX_CACHE_TTL_SECONDS: u64 = 86_400;

    /// Loads configuration from environment variables.
    ///
    /// Unset variables fall back to [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let listen_addr = env::var("LISTEN").unwrap_or(defaults.listen_addr);
        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);
        let viacep_base_url = env::var("VIACEP_BASE_URL").unwrap_or(defaults.viacep_base_url);

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            listen_addr,
            redis_url: Self::load_redis_url(),
            log_level,
            log_format,
            viacep_base_url,
            upstream_timeout_seconds: parse_var(
                "UPSTREAM_TIMEOUT_SECONDS",
                defaults.upstream_timeout_seconds,
            )?,
            cache_ttl_seconds: parse_var("CACHE_TTL_SECONDS", defaults.cache_ttl_seconds)?,
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES", defaults.cache_max_entries)?,
            rate_limit_per_minute: parse_var(
                "RATE_LIMIT_PER_MINUTE",
                defaults.rate_limit_per_minute,
            )?,
            behind_proxy,
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            // Empty password means no authentication
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `redis_url` or `viacep_base_url` has an unsupported scheme
    /// - a TTL, timeout, capacity or rate limit is out of range
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                redis_url
            );
        }

        let base = Url::parse(&self.viacep_base_url).with_context(|| {
            format!("VIACEP_BASE_URL is not a valid URL: '{}'", self.viacep_base_url)
        })?;
        if base.scheme() != "http" && base.scheme() != "https" {
            anyhow::bail!(
                "VIACEP_BASE_URL must use http or https, got '{}'",
                self.viacep_base_url
            );
        }

        if self.upstream_timeout_seconds == 0 || self.upstream_timeout_seconds > 60 {
            anyhow::bail!(
                "UPSTREAM_TIMEOUT_SECONDS must be between 1 and 60, got {}",
                self.upstream_timeout_seconds
            );
        }

        if self.cache_ttl_seconds == 0 || self.cache_ttl_seconds > Self::MAX_CACHE_TTL_SECONDS {
            anyhow::bail!(
                "CACHE_TTL_SECONDS must be between 1 and {}, got {}",
                Self::MAX_CACHE_TTL_SECONDS,
                self.cache_ttl_seconds
            );
        }

        if self.cache_max_entries == 0 {
            anyhow::bail!("CACHE_MAX_ENTRIES must be greater than 0");
        }

        if self.rate_limit_per_minute == 0 {
            anyhow::bail!("RATE_LIMIT_PER_MINUTE must be greater than 0");
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!(
            "  Upstream: {} (timeout {}s)",
            self.viacep_base_url,
            self.upstream_timeout_seconds
        );

        if let Some(ref redis_url) = self.redis_url {
            tracing::info!("  Cache: Redis {}", mask_connection_string(redis_url));
        } else {
            tracing::info!("  Cache: in-memory (max {} entries)", self.cache_max_entries);
        }

        tracing::info!("  Cache TTL: {}s", self.cache_ttl_seconds);
        tracing::info!("  Rate limit: {}/min per client", self.rate_limit_per_minute);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Parses an optional numeric variable, keeping `default` when it is unset.
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

/// Masks sensitive information in connection strings for logging.
///
/// Replaces password with `***` in URLs like:
/// - `redis://:password@host:port/db` → `redis://:***@host:port/db`
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
