use quotefab_rates::RateProviderError;
use thiserror::Error;

/// FX-specific errors.
///
/// `ConversionFailed` is the only variant surfaced to callers of the
/// conversion engine; the others stay internal to the subsystem (rate
/// resolution never fails by contract).
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Currency conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Rate provider error: {0}")]
    ProviderError(String),
}

impl From<RateProviderError> for FxError {
    fn from(err: RateProviderError) -> Self {
        FxError::ProviderError(err.to_string())
    }
}
