use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

/// Key prefix for cached pairwise rates
pub const RATE_CACHE_PREFIX: &str = "rate:";

/// TTL for cached current-date rates
pub const RATE_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Cadence of the scheduled provider refresh
pub const RATE_REFRESH_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// Validity window of a freshly fetched rate record
pub const RATE_VALIDITY_HOURS: i64 = 24;

/// Relative change above which a refresh flags an anomaly
pub const MAX_RATE_CHANGE: Decimal = dec!(0.1);

/// Percentage fee applied to the source amount when fees are requested
pub const FEE_PERCENTAGE: Decimal = dec!(0.005);

/// Flat fee applied when the source currency is USD
pub const USD_FIXED_FEE: Decimal = dec!(0.30);

/// Decimal precision for fee amounts
pub const FEE_DECIMAL_PRECISION: u32 = 2;
