//! Open Exchange Rates provider.
//!
//! Fetches the latest USD-based rate table from the Open Exchange Rates
//! `latest.json` endpoint. Requires an app id (API key); the free tier only
//! supports USD as the base currency, which is all this subsystem needs.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::errors::RateProviderError;
use crate::models::RateTable;
use crate::provider::RateProviderTrait;

/// Provider ID constant, recorded as the `source` of persisted rates.
const PROVIDER_ID: &str = "openexchangerates";

/// Endpoint for the latest full rate table.
const LATEST_URL: &str = "https://openexchangerates.org/api/latest.json";

/// Default HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Open Exchange Rates client.
///
/// # Example
///
/// ```ignore
/// use quotefab_rates::OpenExchangeRatesProvider;
///
/// let provider = OpenExchangeRatesProvider::new("your_app_id".to_string());
/// ```
pub struct OpenExchangeRatesProvider {
    client: Client,
    app_id: String,
}

impl OpenExchangeRatesProvider {
    /// Create a new provider with the given app id.
    pub fn new(app_id: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, app_id }
    }
}

#[async_trait]
impl RateProviderTrait for OpenExchangeRatesProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_latest(&self) -> Result<RateTable, RateProviderError> {
        debug!("Fetching latest rate table from {}", LATEST_URL);

        let response = self
            .client
            .get(LATEST_URL)
            .query(&[("app_id", self.app_id.as_str()), ("base", "USD")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateProviderError::Http {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
            });
        }

        let table = response
            .json::<RateTable>()
            .await
            .map_err(|e| RateProviderError::Parse(e.to_string()))?;

        debug!(
            "Fetched {} rates with base {} (provider timestamp {})",
            table.rates.len(),
            table.base,
            table.timestamp
        );

        Ok(table)
    }
}
