//! Quotefab Core - FX domain entities, services, and traits.
//!
//! This crate contains the currency exchange-rate resolution and conversion
//! logic for the Quotefab platform. It is database-agnostic and defines
//! traits that are implemented by the `storage-sqlite` crate (rate store)
//! and by the wider system (cache store).

pub mod constants;
pub mod errors;
pub mod fx;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
