//! Parsing and formatting of user-entered amounts.
//!
//! CRITICAL: Rounding strategy:
//! - The only place fractional minor units are dropped is [`round_to_minor`]
//! - Midpoints round half away from zero (`1.005 SEK` -> `101` öre,
//!   `0.5 JPY` -> `1` yen), matching `Math.round` for non-negative input
//! - No floating point anywhere; amounts are parsed as `Decimal`

use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use tripsplit_shared::types::{Currency, Money};

use crate::error::ValidationError;

/// Rounds a value expressed in minor units to a whole number of minor units.
///
/// Returns `None` if the result does not fit in an `i64`.
#[must_use]
pub fn round_to_minor(value: Decimal) -> Option<i64> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Converts a major-unit value to minor units of `currency`.
pub fn to_minor(major: Decimal, currency: Currency) -> Result<i64, ValidationError> {
    major
        .checked_mul(Decimal::from(currency.minor_per_major()))
        .and_then(round_to_minor)
        .ok_or_else(|| ValidationError::InvalidAmount(major.to_string()))
}

/// Parses user input such as `"300"`, `"12,50"` or `"12.5"` into minor units.
///
/// A comma is accepted as decimal separator. Anything that is not a plain
/// decimal number is rejected.
///
/// # Example
///
/// ```
/// use tripsplit_core::money::parse_minor;
/// use tripsplit_shared::types::Currency;
///
/// assert_eq!(parse_minor("12,50", Currency::Sek).unwrap(), 1250);
/// assert_eq!(parse_minor("1000", Currency::Jpy).unwrap(), 1000);
/// ```
pub fn parse_minor(input: &str, currency: Currency) -> Result<i64, ValidationError> {
    let normalized = input.trim().replace(',', ".");
    let major = Decimal::from_str(&normalized)
        .map_err(|_| ValidationError::InvalidAmount(input.to_string()))?;
    to_minor(major, currency).map_err(|_| ValidationError::InvalidAmount(input.to_string()))
}

/// Formats minor units as `"<major> <CODE>"`, e.g. `"300.00 SEK"` or `"1000 JPY"`.
#[must_use]
pub fn format_minor(amount_minor: i64, currency: Currency) -> String {
    format_money(Money::new(amount_minor, currency))
}

/// Formats a [`Money`] value, always with the currency's full decimal places.
#[must_use]
pub fn format_money(money: Money) -> String {
    format!("{} {}", money.to_major(), money.currency)
}

/// Parses a currency code, mapping failures into a validation error.
pub fn parse_currency(code: &str) -> Result<Currency, ValidationError> {
    Currency::from_str(code).map_err(|e| ValidationError::UnknownCurrency(e.0))
}
