//! Data Transfer Objects for API responses.
//!
//! The lookup endpoint serializes [`crate::domain::entities::AddressRecord`]
//! directly; error bodies are [`crate::error::ErrorBody`].

pub mod health;
