//! Discount utilities
//!
//! The two discount shapes a promotion can carry, and the arithmetic that applies them to a
//! line's base amount.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError};
use thiserror::Error;

use crate::prices::{Amount, format_percentage};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Discount carried by a promotion.
#[derive(Debug, Copy, Clone)]
pub enum Discount {
    /// Take a percentage off the line (`percent` promotions, e.g. "10% off").
    PercentageOff(Percentage),

    /// Subtract a fixed amount from the line, never going below zero (`direct` promotions).
    AmountOff(Amount),
}

impl Discount {
    /// The promotion type name shown to users: `percent` or `direct`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Discount::PercentageOff(_) => "percent",
            Discount::AmountOff(_) => "direct",
        }
    }

    /// Human readable magnitude, e.g. `10%` or the formatted amount.
    pub fn magnitude(&self) -> String {
        match self {
            Discount::PercentageOff(pct) => format_percentage(pct),
            Discount::AmountOff(amount) => amount.to_string(),
        }
    }

    /// Apply the discount to a base amount.
    ///
    /// The result is never negative.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if:
    /// - Percentage calculation overflows or cannot be safely represented.
    /// - The fixed amount is in a different currency than `base`.
    pub fn apply(&self, base: &Amount) -> Result<Amount, DiscountError> {
        let base_minor = base.to_minor_units();

        let discounted_minor = match self {
            Discount::PercentageOff(pct) => base_minor
                .checked_sub(percent_of_minor(pct, base_minor)?)
                .ok_or(DiscountError::PercentConversion)?,
            Discount::AmountOff(amount) => base.sub(*amount)?.to_minor_units(),
        };

        Ok(Money::from_minor(0.max(discounted_minor), base.currency()))
    }
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// Rounds half away from zero to whole minor units.
///
/// # Errors
///
/// Returns an error if:
/// - The percentage calculation overflows or cannot be safely represented (`DiscountError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Returns `true` if the percentage lies within 0–100 %.
pub fn is_valid_percentage(percent: &Percentage) -> bool {
    let fraction = (*percent) * Decimal::ONE;

    fraction >= Decimal::ZERO && fraction <= Decimal::ONE
}
