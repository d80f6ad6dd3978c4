//! Prices
//!
//! Amounts are kept as [`Money`] in minor units. This module parses the textual forms used by
//! catalog fixtures (`"100000 VND"`, `"10%"`) and by the order form (a bare amount in the
//! session currency).

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// A monetary amount in a statically known ISO currency.
pub type Amount = Money<'static, Currency>;

/// Errors raised while parsing prices and percentages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The value is not in the `AMOUNT CURRENCY` form or the amount is not a number.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// The amount has more precision than the currency's minor unit, or overflows it.
    #[error("amount {0} cannot be represented in minor units")]
    Unrepresentable(String),

    /// The amount is negative.
    #[error("amount must not be negative: {0}")]
    Negative(String),

    /// Invalid percentage format
    #[error("invalid percentage: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Look up one of the supported ISO currencies by its alphabetic code.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for any code outside the supported set.
pub fn currency(code: &str) -> Result<&'static Currency, PriceError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "VND" => Ok(iso::VND),
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        "GBP" => Ok(iso::GBP),
        other => Err(PriceError::UnknownCurrency(other.to_string())),
    }
}

/// Parse price string (e.g., `"100000 VND"` or `"2.99 GBP"`) into an amount.
///
/// # Errors
///
/// Returns an error if the string is not in the format `AMOUNT CURRENCY`, if the amount cannot
/// be parsed or represented in minor units, or if the currency code is not recognised.
pub fn parse_price(s: &str) -> Result<Amount, PriceError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceError::InvalidPrice(format!(
            "expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    parse_amount(amount, currency(code)?)
}

/// Parse a bare amount (e.g., `"120000"` or `"12.50"`) in major units of `currency`.
///
/// Thousands separators (`,` and `_`) are accepted and ignored.
///
/// # Errors
///
/// Returns an error if the amount is not a number, is negative, or has more fractional digits
/// than the currency allows.
pub fn parse_amount(s: &str, currency: &'static Currency) -> Result<Amount, PriceError> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    let amount = cleaned
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PriceError::Negative(s.to_string()));
    }

    let minor = amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .filter(|scaled| scaled.fract().is_zero())
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(|| PriceError::Unrepresentable(s.to_string()))?;

    Ok(Money::from_minor(minor, currency))
}

/// Parse percentage string (e.g., `"15%"` or `"0.15"`) into a [`Percentage`]
///
/// Accepts two formats:
/// - Percentage format: `"15%"` for 15%
/// - Decimal format: `"0.15"` for 15%
///
/// The value is parsed as a [`Decimal`], so it stays exact.
///
/// # Errors
///
/// Returns an error if the string is not a decimal number.
pub fn parse_percentage(s: &str) -> Result<Percentage, PriceError> {
    let trimmed = s.trim();

    let (number, is_percent) = match trimmed.strip_suffix('%') {
        Some(percent_str) => (percent_str.trim(), true),
        None => (trimmed, false),
    };

    let value = number
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidPercentage(s.to_string()))?;

    let fraction = if is_percent {
        value
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(|| PriceError::InvalidPercentage(s.to_string()))?
    } else {
        value
    };

    Ok(Percentage::from(fraction))
}

/// Render a percentage as whole-number-friendly text, e.g. `10%` or `12.5%`.
pub fn format_percentage(percent: &Percentage) -> String {
    let value = ((*percent) * Decimal::ONE_HUNDRED).round_dp(2).normalize();

    format!("{value}%")
}
