//! Money type with fixed-point decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every stored amount carries at most [`MONEY_SCALE`] fractional digits and
//! [`MONEY_PRECISION`] digits in total.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::CurrencyId;

/// Number of fractional digits kept on every monetary amount.
pub const MONEY_SCALE: u32 = 4;

/// Total number of significant digits a monetary amount may use.
pub const MONEY_PRECISION: u32 = 13;

/// Errors raised by money arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The value needs more integral digits than the configured precision allows.
    #[error("Amount {amount} exceeds {precision} digits with {scale} decimal places")]
    Overflow {
        /// The offending value.
        amount: Decimal,
        /// Total digits allowed.
        precision: u32,
        /// Fractional digits allowed.
        scale: u32,
    },
    /// The result of an operation falls outside the decimal range.
    #[error("Amount arithmetic on {left} and {right} is out of range")]
    OutOfRange {
        /// Left operand.
        left: Decimal,
        /// Right operand.
        right: Decimal,
    },
}

/// Represents a monetary amount in a currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount, at most four decimal places.
    pub amount: Decimal,
    /// The currency the amount is denominated in.
    pub currency: CurrencyId,
}

impl Money {
    /// Creates a new Money instance, rounding the amount to the money scale.
    #[must_use]
    pub fn new(amount: Decimal, currency: CurrencyId) -> Self {
        Self {
            amount: round(amount),
            currency,
        }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: CurrencyId) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

/// Round a value to the money scale using Banker's Rounding.
///
/// Uses `RoundingStrategy::MidpointNearestEven`:
/// - 2.00005 → 2.0000
/// - 2.00015 → 2.0002
#[must_use]
pub fn round(value: Decimal) -> Decimal {
    round_to(value, MONEY_SCALE)
}

/// Round a value to `scale` fractional digits using Banker's Rounding.
#[must_use]
pub fn round_to(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven)
}

/// Checks that a value fits `precision` total digits with `scale` fractional digits.
///
/// The value is rounded to `scale` first; only the integral part can overflow.
/// A limit wider than `Decimal` itself admits every value.
pub fn ensure_precision(value: Decimal, precision: u32, scale: u32) -> Result<Decimal, MoneyError> {
    let rounded = round_to(value, scale);
    let integral_digits = precision.saturating_sub(scale);
    let limit = (0..integral_digits).try_fold(Decimal::ONE, |limit, _| limit.checked_mul(Decimal::TEN));
    if limit.is_some_and(|limit| rounded.abs() >= limit) {
        return Err(MoneyError::Overflow {
            amount: value,
            precision,
            scale,
        });
    }
    Ok(rounded)
}

/// `left × right`, rounded, or `OutOfRange` when the product does not fit.
pub fn checked_product(left: Decimal, right: Decimal) -> Result<Decimal, MoneyError> {
    left.checked_mul(right)
        .map(round)
        .ok_or(MoneyError::OutOfRange { left, right })
}

/// `left + right`, or `OutOfRange` when the sum does not fit.
pub fn checked_sum(left: Decimal, right: Decimal) -> Result<Decimal, MoneyError> {
    left.checked_add(right)
        .ok_or(MoneyError::OutOfRange { left, right })
}

/// Percentage of a value: `value × rate / 100`, rounded.
pub fn percentage(value: Decimal, rate: Decimal) -> Result<Decimal, MoneyError> {
    checked_product(value, rate / Decimal::ONE_HUNDRED)
}

/// The tax already contained in a tax-inclusive `gross`: `gross × rate / (100 + rate)`, rounded.
pub fn inclusive_portion(gross: Decimal, rate: Decimal) -> Result<Decimal, MoneyError> {
    let divisor = Decimal::ONE_HUNDRED
        .checked_add(rate)
        .ok_or(MoneyError::OutOfRange {
            left: Decimal::ONE_HUNDRED,
            right: rate,
        })?;
    let share = rate
        .checked_div(divisor)
        .ok_or(MoneyError::OutOfRange { left: rate, right: divisor })?;
    checked_product(gross, share)
}
