//! # CEP Lookup
//!
//! A small caching proxy for Brazilian postal code (CEP) lookups built with Axum.
//!
//! `GET /cep/{cep}` validates the code, serves it from a short-lived cache when
//! possible, and otherwise queries the public ViaCEP API, normalizing the answer
//! into a fixed five-field record.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - CEP validation, the address entity, provider traits
//! - **Application Layer** ([`application`]) - The lookup orchestrator
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis / in-memory cache, ViaCEP client
//! - **API Layer** ([`api`]) - Handlers, DTOs and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"  # Optional
//! cargo run
//! curl http://localhost:3000/cep/14784478
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{CepService, LookupError};
    pub use crate::domain::entities::AddressRecord;
    pub use crate::domain::providers::{AddressProvider, UpstreamError, UpstreamPayload};
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::{CacheService, InMemoryCache};
    pub use crate::state::AppState;
}
