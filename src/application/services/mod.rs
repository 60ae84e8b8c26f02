//! Business logic services for the application layer.

pub mod cep_service;

pub use cep_service::{CepService, LookupError, NOT_FOUND_MESSAGE};
