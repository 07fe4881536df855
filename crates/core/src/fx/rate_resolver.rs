//! Tiered rate resolution: cache, store, USD cross-rate, static fallback.
//!
//! `resolve` is deliberately infallible: the platform prefers an imprecise
//! rate over a failed pricing flow, so every tier degrades to the next and
//! the final fallback degrades to 1:1. Store and cache failures are logged
//! and treated as "not found".

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

use super::currency::Currency;
use super::fallback::fallback_rate;
use super::fx_traits::{RateCacheTrait, RateRepositoryTrait};
use crate::constants::{RATE_CACHE_PREFIX, RATE_CACHE_TTL};

pub struct RateResolver {
    repository: Arc<dyn RateRepositoryTrait>,
    cache: Arc<dyn RateCacheTrait>,
}

impl RateResolver {
    pub fn new(repository: Arc<dyn RateRepositoryTrait>, cache: Arc<dyn RateCacheTrait>) -> Self {
        Self { repository, cache }
    }

    /// Resolves the rate between two currencies.
    ///
    /// `date` of `None` means "current rate", which is the only case that
    /// reads or fills the cache; historical lookups always go to the store.
    /// Only store-resolved rates for the originally requested pair are
    /// cached; fallback-derived values are recomputed on every call.
    pub fn resolve(&self, from: Currency, to: Currency, date: Option<DateTime<Utc>>) -> Decimal {
        if from == to {
            return Decimal::ONE;
        }

        if date.is_none() {
            if let Some(cached) = self.cache.get(&cache_key(from, to)) {
                match Decimal::from_str(&cached) {
                    Ok(rate) if rate > Decimal::ZERO => return rate,
                    _ => log::warn!("Discarding unparseable cached rate for {}-{}", from, to),
                }
            }
        }

        let as_of = date.unwrap_or_else(Utc::now);

        if let Some(rate) = self.resolve_from_store(from, to, as_of) {
            if date.is_none() {
                self.cache
                    .set(&cache_key(from, to), &rate.to_string(), RATE_CACHE_TTL);
            }
            return rate;
        }

        let rate = fallback_rate(from, to);
        log::warn!("Using fallback rate for {}-{}: {}", from, to, rate);
        rate
    }

    /// Store tier: direct record, inverse record, then a USD cross-rate.
    /// Non-positive stored rates are ignored, so the tier only ever
    /// yields positive values.
    ///
    /// Repository errors abort the whole tier (logged, `None`), cascading
    /// to the static fallback.
    fn resolve_from_store(
        &self,
        from: Currency,
        to: Currency,
        as_of: DateTime<Utc>,
    ) -> Option<Decimal> {
        match self.repository.find_rate(from, to, as_of) {
            Ok(Some(record)) if record.rate > Decimal::ZERO => return Some(record.rate),
            Ok(_) => {}
            Err(e) => {
                log::error!("Rate lookup failed for {}-{}: {}", from, to, e);
                return None;
            }
        }

        match self.repository.find_rate(to, from, as_of) {
            Ok(Some(record)) if record.rate > Decimal::ZERO => {
                return Some(Decimal::ONE / record.rate)
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("Inverse rate lookup failed for {}-{}: {}", to, from, e);
                return None;
            }
        }

        if from != Currency::USD && to != Currency::USD {
            let from_to_usd = self.resolve_from_store(from, Currency::USD, as_of)?;
            let usd_to_target = self.resolve_from_store(Currency::USD, to, as_of)?;
            return Some(from_to_usd * usd_to_target);
        }

        None
    }
}

fn cache_key(from: Currency, to: Currency) -> String {
    format!("{}{}-{}", RATE_CACHE_PREFIX, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DatabaseError, Result};
    use crate::fx::cache::InMemoryRateCache;
    use crate::fx::fx_model::{ExchangeRate, NewExchangeRate};
    use crate::fx::fx_traits::InsertOutcome;
    use async_trait::async_trait;
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // --- Mock repository ---
    #[derive(Default)]
    struct MockRateRepository {
        rates: Mutex<Vec<ExchangeRate>>,
        lookups: AtomicUsize,
        fail_lookups: bool,
    }

    impl MockRateRepository {
        fn new() -> Self {
            Self::default()
        }

        fn failing() -> Self {
            Self {
                fail_lookups: true,
                ..Self::default()
            }
        }

        fn with_rate(self, base: Currency, target: Currency, rate: Decimal) -> Self {
            let now = Utc::now();
            self.rates.lock().unwrap().push(ExchangeRate {
                id: format!("{}-{}", base, target),
                base_currency: base,
                target_currency: target,
                rate,
                source: "test".to_string(),
                valid_from: now - Duration::hours(1),
                valid_until: now + Duration::hours(23),
                created_at: now,
            });
            self
        }

        fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateRepositoryTrait for MockRateRepository {
        fn find_rate(
            &self,
            base: Currency,
            target: Currency,
            as_of: DateTime<Utc>,
        ) -> Result<Option<ExchangeRate>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail_lookups {
                return Err(DatabaseError::QueryFailed("disk on fire".to_string()).into());
            }
            Ok(self
                .rates
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.base_currency == base
                        && r.target_currency == target
                        && r.valid_from <= as_of
                        && r.valid_until >= as_of
                })
                .max_by_key(|r| r.valid_from)
                .cloned())
        }

        fn find_latest_created(
            &self,
            _base: Currency,
            _target: Currency,
        ) -> Result<Option<ExchangeRate>> {
            unimplemented!()
        }

        async fn insert_rate(&self, _new_rate: NewExchangeRate) -> Result<InsertOutcome> {
            unimplemented!()
        }

        fn list_latest_rates(&self) -> Result<Vec<ExchangeRate>> {
            Ok(self.rates.lock().unwrap().clone())
        }
    }

    fn resolver(repo: Arc<MockRateRepository>) -> (RateResolver, Arc<InMemoryRateCache>) {
        let cache = Arc::new(InMemoryRateCache::new());
        (RateResolver::new(repo, cache.clone()), cache)
    }

    #[test]
    fn same_currency_resolves_to_one_without_any_lookup() {
        let repo = Arc::new(MockRateRepository::new());
        let (resolver, cache) = resolver(repo.clone());

        assert_eq!(resolver.resolve(Currency::EUR, Currency::EUR, None), dec!(1));
        assert_eq!(repo.lookup_count(), 0);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn direct_record_wins_and_is_cached() {
        let repo = Arc::new(
            MockRateRepository::new().with_rate(Currency::USD, Currency::EUR, dec!(0.92)),
        );
        let (resolver, cache) = resolver(repo.clone());

        assert_eq!(resolver.resolve(Currency::USD, Currency::EUR, None), dec!(0.92));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn second_call_within_ttl_does_not_hit_the_store() {
        let repo = Arc::new(
            MockRateRepository::new().with_rate(Currency::USD, Currency::EUR, dec!(0.92)),
        );
        let (resolver, _cache) = resolver(repo.clone());

        resolver.resolve(Currency::USD, Currency::EUR, None);
        let lookups_after_first = repo.lookup_count();
        let rate = resolver.resolve(Currency::USD, Currency::EUR, None);

        assert_eq!(rate, dec!(0.92));
        assert_eq!(repo.lookup_count(), lookups_after_first);
    }

    #[test]
    fn inverse_record_is_inverted() {
        let repo = Arc::new(
            MockRateRepository::new().with_rate(Currency::USD, Currency::EUR, dec!(0.92)),
        );
        let (resolver, _cache) = resolver(repo);

        let rate = resolver.resolve(Currency::EUR, Currency::USD, None);
        assert_eq!(rate, Decimal::ONE / dec!(0.92));
    }

    #[test]
    fn cross_rate_composes_through_usd() {
        let repo = Arc::new(
            MockRateRepository::new()
                .with_rate(Currency::EUR, Currency::USD, dec!(1.087))
                .with_rate(Currency::USD, Currency::MXN, dec!(17.5)),
        );
        let (resolver, _cache) = resolver(repo);

        let rate = resolver.resolve(Currency::EUR, Currency::MXN, None);
        assert_eq!(rate, dec!(1.087) * dec!(17.5));
    }

    #[test]
    fn historical_lookup_skips_the_cache() {
        let repo = Arc::new(
            MockRateRepository::new().with_rate(Currency::USD, Currency::EUR, dec!(0.92)),
        );
        let (resolver, cache) = resolver(repo.clone());

        let date = Utc::now() - Duration::minutes(5);
        let rate = resolver.resolve(Currency::USD, Currency::EUR, Some(date));

        assert_eq!(rate, dec!(0.92));
        assert_eq!(cache.len(), 0, "historical lookups must not fill the cache");
    }

    #[test]
    fn expired_record_falls_back_to_static_table() {
        let repo = Arc::new(
            MockRateRepository::new().with_rate(Currency::USD, Currency::EUR, dec!(0.95)),
        );
        let (resolver, cache) = resolver(repo);

        // Query far in the past, before any stored window.
        let date = Utc::now() - Duration::days(30);
        let rate = resolver.resolve(Currency::USD, Currency::EUR, Some(date));

        assert_eq!(rate, dec!(0.92), "expected the static fallback value");
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn empty_store_degrades_to_fallback_table() {
        let repo = Arc::new(MockRateRepository::new());
        let (resolver, cache) = resolver(repo);

        let rate = resolver.resolve(Currency::EUR, Currency::MXN, None);
        assert_eq!(rate, dec!(17.5) / dec!(0.92));
        assert_eq!(cache.len(), 0, "fallback-derived rates are not cached");
    }

    #[test]
    fn zero_store_rate_falls_through_to_fallback() {
        let repo = Arc::new(
            MockRateRepository::new().with_rate(Currency::USD, Currency::EUR, dec!(0)),
        );
        let (resolver, cache) = resolver(repo);

        let rate = resolver.resolve(Currency::USD, Currency::EUR, None);
        assert_eq!(rate, dec!(0.92), "zero records must not escape resolution");
        assert!(rate > Decimal::ZERO);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn negative_inverse_record_is_ignored() {
        let repo = Arc::new(
            MockRateRepository::new().with_rate(Currency::USD, Currency::EUR, dec!(-0.92)),
        );
        let (resolver, _cache) = resolver(repo);

        let rate = resolver.resolve(Currency::EUR, Currency::USD, None);
        assert_eq!(rate, Decimal::ONE / dec!(0.92));
    }

    #[test]
    fn repository_failure_is_swallowed_and_falls_back() {
        let repo = Arc::new(MockRateRepository::failing());
        let (resolver, _cache) = resolver(repo);

        let rate = resolver.resolve(Currency::USD, Currency::JPY, None);
        assert_eq!(rate, dec!(149));
    }

    #[test]
    fn unparseable_cache_entry_is_treated_as_a_miss() {
        let repo = Arc::new(
            MockRateRepository::new().with_rate(Currency::USD, Currency::EUR, dec!(0.92)),
        );
        let cache = Arc::new(InMemoryRateCache::new());
        cache.set("rate:USD-EUR", "not-a-number", RATE_CACHE_TTL);
        let resolver = RateResolver::new(repo, cache);

        assert_eq!(resolver.resolve(Currency::USD, Currency::EUR, None), dec!(0.92));
    }
}
