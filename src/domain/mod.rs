//! Domain layer containing business entities and contracts.
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.
//!
//! # Architecture
//!
//! - [`cep`] - Postal code format validation and cache key construction
//! - [`entities`] - Core business data structures
//! - [`providers`] - Upstream lookup trait definitions
//!
//! # Lookup Flow
//!
//! 1. HTTP handler validates the path parameter with [`cep::is_valid_cep`]
//! 2. [`crate::application::services::CepService`] checks the cache
//! 3. On a miss, a [`providers::AddressProvider`] fetches the raw payload
//! 4. The payload is normalized into an [`entities::AddressRecord`] and cached

pub mod cep;
pub mod entities;
pub mod providers;
