//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod cep;
pub mod health;

pub use cep::cep_handler;
pub use health::health_handler;
