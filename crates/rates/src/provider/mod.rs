//! Rate provider implementations.

mod open_exchange_rates;
mod traits;

pub use open_exchange_rates::OpenExchangeRatesProvider;
pub use traits::RateProviderTrait;
