use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use quotefab_core::fx::{Currency, ExchangeRate, NewExchangeRate};

use crate::errors::StorageError;
use crate::schema::exchange_rates;

/// Database row for an exchange-rate record. Decimals and timestamps are
/// stored as TEXT; timestamps use a fixed-width RFC3339 form so string
/// comparison orders chronologically.
#[derive(Queryable, Insertable, Identifiable, Debug, Clone)]
#[diesel(table_name = exchange_rates)]
pub struct ExchangeRateDB {
    pub id: String,
    pub base_currency: String,
    pub target_currency: String,
    pub rate: String,
    pub source: String,
    pub valid_from: String,
    pub valid_until: String,
    pub created_at: String,
}

/// Serializes a timestamp in the canonical stored form.
pub(crate) fn timestamp_to_db(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn timestamp_from_db(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::MalformedRecord(format!("timestamp '{}': {}", raw, e)))
}

fn currency_from_db(raw: &str) -> Result<Currency, StorageError> {
    Currency::from_code(raw)
        .ok_or_else(|| StorageError::MalformedRecord(format!("unknown currency '{}'", raw)))
}

impl ExchangeRateDB {
    pub fn from_new(new_rate: &NewExchangeRate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            base_currency: new_rate.base_currency.as_str().to_string(),
            target_currency: new_rate.target_currency.as_str().to_string(),
            rate: new_rate.rate.to_string(),
            source: new_rate.source.clone(),
            valid_from: timestamp_to_db(new_rate.valid_from),
            valid_until: timestamp_to_db(new_rate.valid_until),
            created_at: timestamp_to_db(Utc::now()),
        }
    }
}

impl TryFrom<ExchangeRateDB> for ExchangeRate {
    type Error = StorageError;

    fn try_from(row: ExchangeRateDB) -> Result<Self, Self::Error> {
        Ok(ExchangeRate {
            base_currency: currency_from_db(&row.base_currency)?,
            target_currency: currency_from_db(&row.target_currency)?,
            rate: Decimal::from_str(&row.rate)
                .map_err(|e| StorageError::MalformedRecord(format!("rate '{}': {}", row.rate, e)))?,
            valid_from: timestamp_from_db(&row.valid_from)?,
            valid_until: timestamp_from_db(&row.valid_until)?,
            created_at: timestamp_from_db(&row.created_at)?,
            id: row.id,
            source: row.source,
        })
    }
}
