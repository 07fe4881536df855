//! Wire models shared by all rate providers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

/// A full table of exchange rates relative to a single base currency.
///
/// This mirrors the shape of the Open Exchange Rates `latest.json` payload.
/// Extra fields in the payload (disclaimer, license) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RateTable {
    /// Provider-side timestamp of the quoted rates (unix seconds on the wire).
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    /// Base currency the rates are denominated from, "USD" in practice.
    pub base: String,
    /// Rate per currency code: 1 unit of base = `rate` units of the code.
    pub rates: HashMap<String, Decimal>,
}
