use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

use quotefab_rates::RateProviderTrait;

use super::conversion::ConversionEngine;
use super::currency::Currency;
use super::fx_model::{
    ConversionOptions, ConversionResult, ExchangeRate, RateUpdateStatus, RatesSnapshot,
};
use super::fx_traits::{FxServiceTrait, RateCacheTrait, RateRepositoryTrait};
use super::rate_resolver::RateResolver;
use super::rate_updater::RateUpdater;
use crate::errors::Result;

/// Facade over the resolver, conversion engine, and updater.
///
/// This is the only type the rest of the system talks to; it is cheap to
/// share behind an `Arc` and safe for concurrent use.
pub struct FxService {
    repository: Arc<dyn RateRepositoryTrait>,
    resolver: Arc<RateResolver>,
    engine: ConversionEngine,
    updater: Arc<RateUpdater>,
}

impl FxService {
    /// Snapshot `source` tag, matching the platform identifier used by
    /// downstream reporting.
    const SNAPSHOT_SOURCE: &'static str = "quotefab";

    /// `provider` is `None` when no API key is configured; rate refresh is
    /// then skipped and resolution relies on stored/fallback data.
    pub fn new(
        repository: Arc<dyn RateRepositoryTrait>,
        cache: Arc<dyn RateCacheTrait>,
        provider: Option<Arc<dyn RateProviderTrait>>,
    ) -> Self {
        let resolver = Arc::new(RateResolver::new(repository.clone(), cache));
        let engine = ConversionEngine::new(resolver.clone());
        let updater = Arc::new(RateUpdater::new(repository.clone(), provider));

        Self {
            repository,
            resolver,
            engine,
            updater,
        }
    }

    /// Shared handle to the updater, for scheduler wiring.
    pub fn updater(&self) -> Arc<RateUpdater> {
        self.updater.clone()
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    fn get_rate(&self, from: Currency, to: Currency, date: Option<DateTime<Utc>>) -> Decimal {
        self.resolver.resolve(from, to, date)
    }

    fn convert(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
        options: ConversionOptions,
    ) -> Result<ConversionResult> {
        Ok(self.engine.convert(amount, from, to, &options)?)
    }

    fn get_exchange_rates(&self, base: Currency) -> RatesSnapshot {
        let now = Utc::now();
        let mut rates = BTreeMap::new();

        for &currency in Currency::all() {
            let rate = if currency == base {
                Decimal::ONE
            } else {
                self.resolver.resolve(base, currency, None)
            };
            rates.insert(currency, rate);
        }

        RatesSnapshot {
            base,
            date: now.format("%Y-%m-%d").to_string(),
            rates,
            source: Self::SNAPSHOT_SOURCE.to_string(),
            updated_at: now,
        }
    }

    fn get_supported_currencies(&self) -> Vec<Currency> {
        Currency::all().to_vec()
    }

    fn is_valid_currency(&self, code: &str) -> bool {
        Currency::is_valid_code(code)
    }

    fn list_latest_rates(&self) -> Result<Vec<ExchangeRate>> {
        self.repository.list_latest_rates()
    }

    async fn force_rate_update(&self) -> RateUpdateStatus {
        let summary = self.updater.refresh().await;
        RateUpdateStatus {
            success: true,
            message: format!(
                "Exchange rates updated: {} rates, {} alerts",
                summary.updated, summary.alerts
            ),
        }
    }
}
