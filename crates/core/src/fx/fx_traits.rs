use super::currency::Currency;
use super::fx_model::{
    ConversionOptions, ConversionResult, ExchangeRate, NewExchangeRate, RateUpdateStatus,
    RatesSnapshot,
};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::time::Duration;

/// Outcome of an append-only rate insert.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// The record was written.
    Inserted(ExchangeRate),
    /// A record with the same (base, target, valid_from) already exists.
    Conflict,
}

/// Trait defining the contract for the persistent rate store.
#[async_trait]
pub trait RateRepositoryTrait: Send + Sync {
    /// Most recent record for the pair whose validity window contains
    /// `as_of` (newest `valid_from` wins).
    fn find_rate(
        &self,
        base: Currency,
        target: Currency,
        as_of: DateTime<Utc>,
    ) -> Result<Option<ExchangeRate>>;

    /// Most recently created record for the pair, irrespective of its
    /// validity window. Used for refresh-time change detection.
    fn find_latest_created(
        &self,
        base: Currency,
        target: Currency,
    ) -> Result<Option<ExchangeRate>>;

    /// Appends a new rate record; duplicate windows report `Conflict`
    /// instead of erroring.
    async fn insert_rate(&self, new_rate: NewExchangeRate) -> Result<InsertOutcome>;

    /// Latest record per currency pair, for the admin rate listing.
    fn list_latest_rates(&self) -> Result<Vec<ExchangeRate>>;
}

/// Trait defining the contract for the short-TTL rate cache.
///
/// String-typed key/value to match the external cache store (Redis in the
/// wider system); an in-process implementation is provided for wiring and
/// tests.
pub trait RateCacheTrait: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str, ttl: Duration);
}

/// Trait defining the FX surface exposed to the rest of the system.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Resolved rate between two currencies, optionally at a historical
    /// timestamp. Never fails; degrades to a 1:1 rate in the worst case.
    fn get_rate(&self, from: Currency, to: Currency, date: Option<DateTime<Utc>>) -> Decimal;

    /// Converts an amount between currencies with optional fees and
    /// currency-specific rounding.
    fn convert(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
        options: ConversionOptions,
    ) -> Result<ConversionResult>;

    /// Current rates for all supported currencies relative to `base`.
    fn get_exchange_rates(&self, base: Currency) -> RatesSnapshot;

    /// All supported currencies.
    fn get_supported_currencies(&self) -> Vec<Currency>;

    /// Whether `code` names a supported currency.
    fn is_valid_currency(&self, code: &str) -> bool;

    /// Latest stored record per pair, for the admin listing.
    fn list_latest_rates(&self) -> Result<Vec<ExchangeRate>>;

    /// Administrative trigger: runs a refresh cycle synchronously.
    async fn force_rate_update(&self) -> RateUpdateStatus;
}
