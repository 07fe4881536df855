//! Rate provider trait definition.

use async_trait::async_trait;

use crate::errors::RateProviderError;
use crate::models::RateTable;

/// Trait for external exchange-rate providers.
///
/// Implement this trait to add support for a new rate source. A provider
/// is expected to return the complete table of USD-denominated rates in a
/// single call; incremental or per-pair fetching is not part of the
/// contract.
#[async_trait]
pub trait RateProviderTrait: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Stored as the `source` of every rate record it produces, so it
    /// should be a stable constant like "openexchangerates".
    fn id(&self) -> &'static str;

    /// Fetch the latest full rate table with USD as base.
    async fn fetch_latest(&self) -> Result<RateTable, RateProviderError>;
}
