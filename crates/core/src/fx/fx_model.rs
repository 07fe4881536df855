use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::currency::Currency;

/// A time-versioned exchange-rate record.
///
/// Records are append-only: a refresh cycle creates new records with a 24h
/// validity window; existing records are never mutated, only superseded.
/// Lookups select the most recent record whose window contains the query
/// timestamp.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: String,
    pub base_currency: Currency,
    pub target_currency: Currency,
    #[serde(serialize_with = "serialize_decimal_6")]
    pub rate: Decimal,
    pub source: String,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new rate record.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewExchangeRate {
    pub base_currency: Currency,
    pub target_currency: Currency,
    #[serde(serialize_with = "serialize_decimal_6")]
    pub rate: Decimal,
    pub source: String,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

/// Rounding applied to a converted amount at the destination currency's
/// decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    Floor,
    Ceil,
    #[default]
    Round,
}

/// Options for a single conversion call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionOptions {
    /// Historical timestamp to resolve the rate at; `None` means "now".
    pub date: Option<DateTime<Utc>>,
    /// Whether to subtract conversion fees before rounding.
    pub include_fees: bool,
    /// Rounding applied at the destination currency's precision.
    pub rounding_mode: RoundingMode,
}

/// Fees charged on a conversion: a percentage of the source amount plus a
/// flat component for USD-sourced conversions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeeCalculation {
    pub percentage: Decimal,
    pub fixed: Decimal,
    pub total: Decimal,
}

/// Outcome of a conversion. Derived per call, never persisted.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub original_amount: Decimal,
    pub original_currency: Currency,
    pub converted_amount: Decimal,
    pub converted_currency: Currency,
    #[serde(serialize_with = "serialize_decimal_6")]
    pub rate: Decimal,
    #[serde(serialize_with = "serialize_decimal_6")]
    pub inverse_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<FeeCalculation>,
    pub timestamp: DateTime<Utc>,
}

/// Listing of current rates relative to a base currency.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RatesSnapshot {
    pub base: Currency,
    pub date: String,
    pub rates: BTreeMap<Currency, Decimal>,
    pub source: String,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of an administrative force-update call.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RateUpdateStatus {
    pub success: bool,
    pub message: String,
}

fn serialize_decimal_6<S>(decimal: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let rounded = decimal.round_dp(6);
    serializer.serialize_str(&rounded.to_string())
}
