//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Always round converted money to 2 decimal places
//! - Use banker's rounding (round half to even)
//! - Store both original and converted amounts

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use super::exchange::ExchangeRate;

/// Errors that can occur during rate resolution and conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// No direct or inverse rate exists for the pair.
    #[error("No exchange rate available for {from} to {to}")]
    NoRateAvailable {
        /// Source currency code.
        from: String,
        /// Target currency code.
        to: String,
    },

    /// The only candidate is an inverse rate of zero, which cannot be divided.
    #[error("Inverse exchange rate for {from} to {to} is zero")]
    ZeroInverseRate {
        /// Source currency code.
        from: String,
        /// Target currency code.
        to: String,
    },
}

/// Outcome of converting an amount into a requested target currency.
///
/// A missing rate is reported explicitly instead of echoing the unconverted
/// amount; callers decide whether that is fatal for them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "conversion", rename_all = "snake_case")]
pub enum ConvertedAmount {
    /// Conversion succeeded.
    Converted {
        /// Target currency code.
        currency: String,
        /// Converted amount, banker's-rounded to 2 decimal places.
        amount: Decimal,
    },
    /// No usable rate exists for the pair.
    NoRateAvailable {
        /// Target currency code that was requested.
        currency: String,
    },
}

/// Rounds a monetary value to 2 decimal places using banker's rounding.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Resolves the effective rate for a pair from candidate rates.
///
/// Resolution order:
/// 1. same currency → rate of 1
/// 2. most recent direct rate → used as-is
/// 3. most recent inverse rate → inverted (zero inverse fails)
/// 4. no rate → `RateError::NoRateAvailable`
///
/// Rates are never triangulated through a third currency.
///
/// # Errors
///
/// Returns `RateError` when no usable rate exists.
pub fn resolve_pair_rate(
    candidates: &[ExchangeRate],
    from: &str,
    to: &str,
) -> Result<Decimal, RateError> {
    if from == to {
        return Ok(Decimal::ONE);
    }

    if let Some(direct) = latest_for(candidates, from, to) {
        return Ok(direct.rate);
    }

    if let Some(inverse) = latest_for(candidates, to, from) {
        if inverse.rate == Decimal::ZERO {
            return Err(RateError::ZeroInverseRate {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        return Ok(Decimal::ONE / inverse.rate);
    }

    Err(RateError::NoRateAvailable {
        from: from.to_string(),
        to: to.to_string(),
    })
}

/// Converts an amount between currencies using candidate rates.
///
/// Identity conversions return the amount untouched; everything else is
/// multiplied by the resolved rate and banker's-rounded to 2 decimals.
///
/// # Errors
///
/// Returns `RateError` when no usable rate exists.
pub fn convert_amount(
    amount: Decimal,
    from: &str,
    to: &str,
    candidates: &[ExchangeRate],
) -> Result<Decimal, RateError> {
    if from == to {
        return Ok(amount);
    }
    let rate = resolve_pair_rate(candidates, from, to)?;
    Ok(round_money(amount * rate))
}

/// Most recent candidate covering the exact pair.
fn latest_for<'a>(
    candidates: &'a [ExchangeRate],
    base: &str,
    target: &str,
) -> Option<&'a ExchangeRate> {
    candidates
        .iter()
        .filter(|r| r.covers(base, target))
        .max_by_key(|r| r.captured_at)
}
