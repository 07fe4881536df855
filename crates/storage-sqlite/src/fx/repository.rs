use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;
use std::sync::Arc;

use quotefab_core::fx::{
    Currency, ExchangeRate, InsertOutcome, NewExchangeRate, RateRepositoryTrait,
};
use quotefab_core::Result;

use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::fx::model::{timestamp_to_db, ExchangeRateDB};
use crate::schema::exchange_rates;

/// Diesel-backed implementation of the rate store.
///
/// Reads and writes go through the shared pool; writes are append-only and
/// rely on the unique `(base, target, valid_from)` index to reject
/// duplicate refresh windows.
#[derive(Clone)]
pub struct RateRepository {
    pool: Arc<DbPool>,
}

impl RateRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateRepositoryTrait for RateRepository {
    fn find_rate(
        &self,
        base: Currency,
        target: Currency,
        as_of: DateTime<Utc>,
    ) -> Result<Option<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;
        let as_of_db = timestamp_to_db(as_of);

        let row = exchange_rates::table
            .filter(exchange_rates::base_currency.eq(base.as_str()))
            .filter(exchange_rates::target_currency.eq(target.as_str()))
            .filter(exchange_rates::valid_from.le(&as_of_db))
            .filter(exchange_rates::valid_until.ge(&as_of_db))
            .order(exchange_rates::valid_from.desc())
            .first::<ExchangeRateDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(|r| ExchangeRate::try_from(r).map_err(Into::into))
            .transpose()
    }

    fn find_latest_created(
        &self,
        base: Currency,
        target: Currency,
    ) -> Result<Option<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;

        let row = exchange_rates::table
            .filter(exchange_rates::base_currency.eq(base.as_str()))
            .filter(exchange_rates::target_currency.eq(target.as_str()))
            .order(exchange_rates::created_at.desc())
            .first::<ExchangeRateDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(|r| ExchangeRate::try_from(r).map_err(Into::into))
            .transpose()
    }

    async fn insert_rate(&self, new_rate: NewExchangeRate) -> Result<InsertOutcome> {
        let mut conn = get_connection(&self.pool)?;
        let row = ExchangeRateDB::from_new(&new_rate);

        match diesel::insert_into(exchange_rates::table)
            .values(&row)
            .execute(&mut conn)
        {
            Ok(_) => Ok(InsertOutcome::Inserted(
                ExchangeRate::try_from(row).map_err(StorageError::from)?,
            )),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Ok(InsertOutcome::Conflict)
            }
            Err(e) => Err(StorageError::from(e).into()),
        }
    }

    fn list_latest_rates(&self) -> Result<Vec<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = exchange_rates::table
            .order((
                exchange_rates::base_currency.asc(),
                exchange_rates::target_currency.asc(),
                exchange_rates::valid_from.desc(),
            ))
            .load::<ExchangeRateDB>(&mut conn)
            .map_err(StorageError::from)?;

        // Rows arrive newest-first within each pair; keep the first one seen.
        let mut seen: HashMap<(String, String), ()> = HashMap::new();
        let mut latest = Vec::new();
        for row in rows {
            let key = (row.base_currency.clone(), row.target_currency.clone());
            if seen.insert(key, ()).is_none() {
                latest.push(ExchangeRate::try_from(row).map_err(StorageError::from)?);
            }
        }

        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, init};
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn test_repository() -> (RateRepository, TempDir) {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("rates.db");
        let db_path = db_path.to_str().unwrap();

        init(db_path).unwrap();
        let pool = create_pool(db_path).unwrap();
        (RateRepository::new(pool), dir)
    }

    fn record(
        base: Currency,
        target: Currency,
        rate: rust_decimal::Decimal,
        valid_from: DateTime<Utc>,
    ) -> NewExchangeRate {
        NewExchangeRate {
            base_currency: base,
            target_currency: target,
            rate,
            source: "openexchangerates".to_string(),
            valid_from,
            valid_until: valid_from + Duration::hours(24),
        }
    }

    #[tokio::test]
    async fn insert_then_find_within_window() {
        let (repo, _dir) = test_repository();
        let now = Utc::now();

        let outcome = repo
            .insert_rate(record(Currency::USD, Currency::EUR, dec!(0.92), now))
            .await
            .unwrap();
        assert!(matches!(outcome, InsertOutcome::Inserted(_)));

        let found = repo
            .find_rate(Currency::USD, Currency::EUR, now + Duration::hours(1))
            .unwrap()
            .expect("record should be inside its validity window");
        assert_eq!(found.rate, dec!(0.92));
        assert_eq!(found.base_currency, Currency::USD);
        assert_eq!(found.target_currency, Currency::EUR);
    }

    #[tokio::test]
    async fn lookup_outside_window_finds_nothing() {
        let (repo, _dir) = test_repository();
        let now = Utc::now();

        repo.insert_rate(record(Currency::USD, Currency::EUR, dec!(0.92), now))
            .await
            .unwrap();

        assert!(repo
            .find_rate(Currency::USD, Currency::EUR, now - Duration::hours(1))
            .unwrap()
            .is_none());
        assert!(repo
            .find_rate(Currency::USD, Currency::EUR, now + Duration::hours(25))
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn overlapping_windows_pick_newest_valid_from() {
        let (repo, _dir) = test_repository();
        let now = Utc::now();

        repo.insert_rate(record(
            Currency::USD,
            Currency::EUR,
            dec!(0.90),
            now - Duration::hours(12),
        ))
        .await
        .unwrap();
        repo.insert_rate(record(Currency::USD, Currency::EUR, dec!(0.92), now))
            .await
            .unwrap();

        let found = repo
            .find_rate(Currency::USD, Currency::EUR, now + Duration::hours(1))
            .unwrap()
            .unwrap();
        assert_eq!(found.rate, dec!(0.92));
    }

    #[tokio::test]
    async fn duplicate_window_reports_conflict() {
        let (repo, _dir) = test_repository();
        let now = Utc::now();

        repo.insert_rate(record(Currency::USD, Currency::EUR, dec!(0.92), now))
            .await
            .unwrap();
        let outcome = repo
            .insert_rate(record(Currency::USD, Currency::EUR, dec!(0.93), now))
            .await
            .unwrap();

        assert!(matches!(outcome, InsertOutcome::Conflict));
    }

    #[tokio::test]
    async fn latest_created_ignores_validity_window() {
        let (repo, _dir) = test_repository();
        let long_ago = Utc::now() - Duration::days(30);

        repo.insert_rate(record(Currency::USD, Currency::EUR, dec!(0.88), long_ago))
            .await
            .unwrap();

        let latest = repo
            .find_latest_created(Currency::USD, Currency::EUR)
            .unwrap()
            .expect("expired records still count for change detection");
        assert_eq!(latest.rate, dec!(0.88));
    }

    #[tokio::test]
    async fn list_latest_rates_returns_one_record_per_pair() {
        let (repo, _dir) = test_repository();
        let now = Utc::now();

        repo.insert_rate(record(
            Currency::USD,
            Currency::EUR,
            dec!(0.90),
            now - Duration::hours(12),
        ))
        .await
        .unwrap();
        repo.insert_rate(record(Currency::USD, Currency::EUR, dec!(0.92), now))
            .await
            .unwrap();
        repo.insert_rate(record(Currency::USD, Currency::MXN, dec!(17.5), now))
            .await
            .unwrap();

        let latest = repo.list_latest_rates().unwrap();
        assert_eq!(latest.len(), 2);
        let eur = latest
            .iter()
            .find(|r| r.target_currency == Currency::EUR)
            .unwrap();
        assert_eq!(eur.rate, dec!(0.92));
    }

    #[tokio::test]
    async fn missing_pair_finds_nothing() {
        let (repo, _dir) = test_repository();
        assert!(repo
            .find_rate(Currency::USD, Currency::JPY, Utc::now())
            .unwrap()
            .is_none());
        assert!(repo
            .find_latest_created(Currency::USD, Currency::JPY)
            .unwrap()
            .is_none());
    }
}
