//! HTTP clients for external postal code APIs.

mod viacep_client;

pub use viacep_client::ViaCepClient;
