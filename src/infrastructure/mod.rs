//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for caching and upstream lookups.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis and in-memory implementations)
//! - [`upstream`] - HTTP clients for external address APIs

pub mod cache;
pub mod upstream;
