//! Conversion engine: applies a resolved rate to an amount, optionally
//! subtracts fees, and rounds per destination-currency conventions.
//!
//! Fee subtraction happens before rounding, so the rounded result already
//! reflects the fee. Every failure surfaces as `FxError::ConversionFailed`
//! carrying the original cause; callers never see lower-level errors.

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;

use super::currency::Currency;
use super::fx_errors::FxError;
use super::fx_model::{ConversionOptions, ConversionResult, FeeCalculation, RoundingMode};
use super::rate_resolver::RateResolver;
use crate::constants::{FEE_DECIMAL_PRECISION, FEE_PERCENTAGE, USD_FIXED_FEE};

pub struct ConversionEngine {
    resolver: Arc<RateResolver>,
}

impl ConversionEngine {
    pub fn new(resolver: Arc<RateResolver>) -> Self {
        Self { resolver }
    }

    /// Converts `amount` from one currency to another.
    pub fn convert(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
        options: &ConversionOptions,
    ) -> Result<ConversionResult, FxError> {
        let rate = self.resolver.resolve(from, to, options.date);

        let inverse_rate = Decimal::ONE
            .checked_div(rate)
            .ok_or_else(|| FxError::ConversionFailed(format!("rate {} is not invertible", rate)))?;

        let mut converted_amount = amount.checked_mul(rate).ok_or_else(|| {
            FxError::ConversionFailed(format!("amount {} overflows at rate {}", amount, rate))
        })?;

        let fees = options.include_fees.then(|| calculate_fees(amount, from));
        if let Some(fees) = &fees {
            converted_amount -= fees.total;
        }

        let converted_amount = round_by_currency(converted_amount, to, options.rounding_mode);

        Ok(ConversionResult {
            original_amount: amount,
            original_currency: from,
            converted_amount,
            converted_currency: to,
            rate,
            inverse_rate,
            fees,
            timestamp: Utc::now(),
        })
    }
}

/// Fees on a conversion: 0.5% of the source amount, plus a flat 0.30 when
/// the source currency is USD. Components are reported at 2 decimals; the
/// total is rounded from the unrounded percentage amount.
fn calculate_fees(amount: Decimal, from: Currency) -> FeeCalculation {
    let percentage_amount = amount * FEE_PERCENTAGE;
    let fixed = if from == Currency::USD {
        USD_FIXED_FEE
    } else {
        Decimal::ZERO
    };

    FeeCalculation {
        percentage: percentage_amount.round_dp(FEE_DECIMAL_PRECISION),
        fixed,
        total: (percentage_amount + fixed).round_dp(FEE_DECIMAL_PRECISION),
    }
}

/// Rounds an amount at the destination currency's decimal precision.
/// 0-decimal currencies always produce whole units.
fn round_by_currency(amount: Decimal, currency: Currency, mode: RoundingMode) -> Decimal {
    let decimals = currency.decimals();
    let strategy = match mode {
        RoundingMode::Floor => RoundingStrategy::ToZero,
        RoundingMode::Ceil => RoundingStrategy::AwayFromZero,
        RoundingMode::Round => RoundingStrategy::MidpointAwayFromZero,
    };
    amount.round_dp_with_strategy(decimals, strategy)
}
