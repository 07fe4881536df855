//! Error types for the rates crate.

use thiserror::Error;

/// Errors that can occur while fetching rates from an external provider.
///
/// All variants are non-fatal from the system's point of view: a failed
/// fetch leaves previously stored rates (or the static fallback table) in
/// effect until the next scheduled refresh.
#[derive(Error, Debug)]
pub enum RateProviderError {
    /// The provider answered with a non-success HTTP status.
    #[error("Provider returned HTTP status {status}: {provider}")]
    Http {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The request timed out or failed at the transport level.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded into a rate table.
    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RateProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RateProviderError::Parse(err.to_string())
        } else {
            RateProviderError::Network(err.to_string())
        }
    }
}
