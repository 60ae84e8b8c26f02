//! Provider trait definitions for external address sources.
//!
//! A provider is the domain's view of an upstream lookup API. Implementations
//! live in `crate::infrastructure::upstream`; a `mockall` mock is generated for
//! unit tests.

pub mod address_provider;

pub use address_provider::{AddressProvider, UpstreamError, UpstreamPayload};

#[cfg(test)]
pub use address_provider::MockAddressProvider;
