//! Property-based tests for currency operations.
//!
//! - Same-currency conversion is the identity with rate 1
//! - Conversion is deterministic
//! - Parsing and formatting agree

use proptest::prelude::*;
use rust_decimal::Decimal;
use tripsplit_shared::types::Currency;

use super::conversion::convert;
use crate::money::{format_minor, parse_minor};

/// Strategy to generate positive minor-unit amounts.
fn positive_minor() -> impl Strategy<Value = i64> {
    1i64..10_000_000_000i64
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to pick any supported currency.
fn currency() -> impl Strategy<Value = Currency> {
    prop::sample::select(Currency::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Same currency conversion returns the input unchanged and applies rate 1,
    /// whatever rate the caller passed.
    #[test]
    fn prop_same_currency_is_identity(
        amount in positive_minor(),
        rate in proptest::option::of(positive_rate()),
        currency in currency(),
    ) {
        let result = convert(amount, currency, currency, rate).unwrap();
        prop_assert_eq!(result.amount_minor, amount);
        prop_assert_eq!(result.rate, Decimal::ONE);
    }

    /// Calling convert twice with the same inputs gives the same result.
    #[test]
    fn prop_convert_is_deterministic(
        amount in positive_minor(),
        rate in positive_rate(),
    ) {
        let first = convert(amount, Currency::Jpy, Currency::Sek, Some(rate)).unwrap();
        let second = convert(amount, Currency::Jpy, Currency::Sek, Some(rate)).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Positive amounts at positive rates never convert to a negative amount.
    #[test]
    fn prop_positive_inputs_non_negative_output(
        amount in positive_minor(),
        rate in positive_rate(),
    ) {
        let result = convert(amount, Currency::Sek, Currency::Jpy, Some(rate)).unwrap();
        prop_assert!(result.amount_minor >= 0);
    }

    /// Formatting an amount and parsing the number back gives the same minor units.
    #[test]
    fn prop_format_parse_agree(
        amount in -10_000_000_000i64..10_000_000_000i64,
        currency in currency(),
    ) {
        let formatted = format_minor(amount, currency);
        let number = formatted.split(' ').next().unwrap();
        prop_assert_eq!(parse_minor(number, currency).unwrap(), amount);
    }
}
