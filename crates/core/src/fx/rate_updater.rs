//! Scheduled rate refresh: pulls a full USD-based table from the external
//! provider, appends versioned records, and flags abnormal deltas.
//!
//! A refresh never fails outward: a missing provider configuration or a
//! failed fetch is logged and leaves stored/fallback rates in effect. A
//! single bad record never aborts the batch.

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use quotefab_rates::RateProviderTrait;

use super::currency::Currency;
use super::fx_model::NewExchangeRate;
use super::fx_traits::{InsertOutcome, RateRepositoryTrait};
use crate::constants::{MAX_RATE_CHANGE, RATE_VALIDITY_HOURS};

/// Counters from a single refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Records written this cycle (conflicts excluded).
    pub updated: usize,
    /// Anomaly warnings emitted this cycle.
    pub alerts: usize,
}

pub struct RateUpdater {
    repository: Arc<dyn RateRepositoryTrait>,
    provider: Option<Arc<dyn RateProviderTrait>>,
}

impl RateUpdater {
    /// `provider` is `None` when no API key is configured; refresh then
    /// becomes a logged no-op.
    pub fn new(
        repository: Arc<dyn RateRepositoryTrait>,
        provider: Option<Arc<dyn RateProviderTrait>>,
    ) -> Self {
        Self {
            repository,
            provider,
        }
    }

    /// Runs one refresh cycle. Infallible by contract; all failure modes
    /// are logged and reflected only in the returned counters.
    pub async fn refresh(&self) -> RefreshSummary {
        let Some(provider) = &self.provider else {
            log::warn!("Rate provider not configured, skipping rate update");
            return RefreshSummary::default();
        };

        log::info!("Starting exchange rate update...");

        let table = match provider.fetch_latest().await {
            Ok(table) => table,
            Err(e) => {
                log::error!("Failed to update exchange rates: {}", e);
                return RefreshSummary::default();
            }
        };

        let valid_from = table.timestamp;
        let valid_until = valid_from + Duration::hours(RATE_VALIDITY_HOURS);
        let mut summary = RefreshSummary::default();

        for (code, &rate) in &table.rates {
            let Some(currency) = Currency::from_code(code) else {
                continue;
            };

            if rate <= Decimal::ZERO {
                log::warn!("Skipping non-positive rate for {}: {}", currency, rate);
                continue;
            }

            if self.is_abnormal_change(currency, rate) {
                summary.alerts += 1;
            }

            let record = NewExchangeRate {
                base_currency: Currency::USD,
                target_currency: currency,
                rate,
                source: provider.id().to_string(),
                valid_from,
                valid_until,
            };

            match self.repository.insert_rate(record).await {
                Ok(InsertOutcome::Inserted(_)) => summary.updated += 1,
                Ok(InsertOutcome::Conflict) => {}
                Err(e) => log::error!("Failed to save rate for {}: {}", currency, e),
            }
        }

        log::info!(
            "Exchange rate update completed: {} rates updated, {} alerts generated",
            summary.updated,
            summary.alerts
        );

        summary
    }

    /// Change detection against the most recently created record for the
    /// pair, irrespective of its validity window. Warns but never blocks.
    fn is_abnormal_change(&self, currency: Currency, new_rate: Decimal) -> bool {
        let previous = match self.repository.find_latest_created(Currency::USD, currency) {
            Ok(Some(record)) if !record.rate.is_zero() => record.rate,
            Ok(_) => return false,
            Err(e) => {
                log::error!("Failed to load previous rate for {}: {}", currency, e);
                return false;
            }
        };

        let change = ((new_rate - previous) / previous).abs();
        if change > MAX_RATE_CHANGE {
            log::warn!(
                "Large rate change detected for {}: {} -> {} ({}%)",
                currency,
                previous,
                new_rate,
                (change * dec!(100)).round()
            );
            return true;
        }

        false
    }
}
