//! Application layer services implementing business logic.
//!
//! Services coordinate domain types, the cache and upstream providers, and
//! provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::cep_service::CepService`] - Cached postal code lookups

pub mod services;
