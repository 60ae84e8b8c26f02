//! Core domain entities.
//!
//! - [`AddressRecord`] - A normalized postal code lookup result

pub mod address;

pub use address::AddressRecord;
