//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into lookup operations and formats
//! responses according to the API contract.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Rate limiting and request tracing middleware
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
