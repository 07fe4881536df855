//! FX (Foreign Exchange) module - currency metadata, rate resolution,
//! conversion, and the scheduled rate refresh.

pub mod cache;
pub mod conversion;
pub mod currency;
mod fallback;
mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;
mod rate_resolver;
mod rate_updater;
pub mod scheduler;

pub use cache::InMemoryRateCache;
pub use conversion::ConversionEngine;
pub use currency::{Currency, CurrencyConfig, SymbolPosition};
pub use fallback::fallback_rate;
pub use fx_errors::FxError;
pub use fx_model::{
    ConversionOptions, ConversionResult, ExchangeRate, FeeCalculation, NewExchangeRate,
    RateUpdateStatus, RatesSnapshot, RoundingMode,
};
pub use fx_service::FxService;
pub use fx_traits::{FxServiceTrait, InsertOutcome, RateCacheTrait, RateRepositoryTrait};
pub use rate_resolver::RateResolver;
pub use rate_updater::{RateUpdater, RefreshSummary};
