//! Exchange rate types and logic.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::Currency;

use super::conversion::{Conversion, convert};
use crate::error::ValidationError;

/// Exchange rate between two currencies on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency.
    pub from_currency: Currency,
    /// Target currency.
    pub to_currency: Currency,
    /// Exchange rate (1 from_currency = rate to_currency).
    pub rate: Decimal,
    /// Date this rate is effective.
    pub effective_date: NaiveDate,
}

impl ExchangeRate {
    /// Creates a new exchange rate; the rate must be positive.
    pub fn new(
        from_currency: Currency,
        to_currency: Currency,
        rate: Decimal,
        effective_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if rate <= Decimal::ZERO {
            return Err(ValidationError::InvalidRate(rate));
        }
        let rate = if from_currency == to_currency {
            Decimal::ONE
        } else {
            rate
        };
        Ok(Self {
            from_currency,
            to_currency,
            rate,
            effective_date,
        })
    }

    /// Identity rate for a currency.
    #[must_use]
    pub const fn identity(currency: Currency, effective_date: NaiveDate) -> Self {
        Self {
            from_currency: currency,
            to_currency: currency,
            rate: Decimal::ONE,
            effective_date,
        }
    }

    /// Returns the inverse rate.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            from_currency: self.to_currency,
            to_currency: self.from_currency,
            rate: Decimal::ONE / self.rate,
            effective_date: self.effective_date,
        }
    }

    /// Converts an amount in minor units of `from_currency`.
    pub fn apply(&self, amount_minor: i64) -> Result<Conversion, ValidationError> {
        convert(
            amount_minor,
            self.from_currency,
            self.to_currency,
            Some(self.rate),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 28).unwrap()
    }

    #[test]
    fn test_new_rejects_non_positive_rate() {
        assert!(ExchangeRate::new(Currency::Jpy, Currency::Sek, dec!(0), day()).is_err());
        assert!(ExchangeRate::new(Currency::Jpy, Currency::Sek, dec!(-1), day()).is_err());
    }

    #[test]
    fn test_same_pair_is_normalized_to_one() {
        let rate = ExchangeRate::new(Currency::Sek, Currency::Sek, dec!(2), day()).unwrap();
        assert_eq!(rate.rate, Decimal::ONE);
    }

    #[test]
    fn test_inverse() {
        let rate = ExchangeRate::new(Currency::Sek, Currency::Jpy, dec!(16), day()).unwrap();
        let inverse = rate.inverse();
        assert_eq!(inverse.from_currency, Currency::Jpy);
        assert_eq!(inverse.to_currency, Currency::Sek);
        assert_eq!(inverse.rate, dec!(0.0625));
    }

    #[test]
    fn test_apply() {
        let rate = ExchangeRate::new(Currency::Jpy, Currency::Sek, dec!(0.068), day()).unwrap();
        assert_eq!(rate.apply(1000).unwrap().amount_minor, 6800);
        let identity = ExchangeRate::identity(Currency::Jpy, day());
        assert_eq!(identity.apply(1000).unwrap().amount_minor, 1000);
    }
}
