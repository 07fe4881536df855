//! Quotefab exchange-rate provider crate.
//!
//! This crate wraps external exchange-rate APIs behind a narrow,
//! provider-agnostic trait so the core crate stays free of HTTP concerns.
//!
//! # Overview
//!
//! A provider returns a full table of rates denominated in USD in a single
//! call. Provider failures are surfaced as [`RateProviderError`] and are
//! expected to be swallowed by the caller's refresh loop; the rest of the
//! system keeps serving stored or fallback rates when a fetch fails.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::RateProviderError;
pub use models::RateTable;
pub use provider::{OpenExchangeRatesProvider, RateProviderTrait};
