//! Money type in integer minor units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is an `i64` count of the currency's smallest unit
//! (öre for SEK, yen for JPY).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency codes a trip ledger can be kept in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Swedish Krona
    Sek,
    /// Japanese Yen
    Jpy,
    /// Euro
    Eur,
    /// US Dollar
    Usd,
}

/// Returned when a currency code is not one of the supported ones.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

/// Errors from `Money` arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The operands are in different currencies.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        /// Currency of the left-hand operand.
        expected: Currency,
        /// Currency of the right-hand operand.
        got: Currency,
    },

    /// The result does not fit in an `i64` of minor units.
    #[error("Amount overflow")]
    Overflow,
}

impl Currency {
    /// All supported currencies.
    pub const ALL: [Self; 4] = [Self::Sek, Self::Jpy, Self::Eur, Self::Usd];

    /// Number of decimal places in the currency's minor unit.
    #[must_use]
    pub const fn decimal_places(self) -> u32 {
        match self {
            Self::Jpy => 0,
            Self::Sek | Self::Eur | Self::Usd => 2,
        }
    }

    /// Number of minor units in one major unit (`10^decimal_places`).
    #[must_use]
    pub const fn minor_per_major(self) -> i64 {
        10i64.pow(self.decimal_places())
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sek => "SEK",
            Self::Jpy => "JPY",
            Self::Eur => "EUR",
            Self::Usd => "USD",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SEK" => Ok(Self::Sek),
            "JPY" => Ok(Self::Jpy),
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

/// A monetary amount in minor units of a specific currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's smallest unit.
    pub amount_minor: i64,
    /// Currency of the amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Exact major-unit value, e.g. `30000` öre is `300.00`.
    #[must_use]
    pub fn to_major(&self) -> Decimal {
        Decimal::new(self.amount_minor, self.currency.decimal_places())
    }

    /// Adds two amounts of the same currency.
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount_minor
            .checked_add(other.amount_minor)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Subtracts `other` from `self`; both must share a currency.
    pub fn checked_sub(self, other: Self) -> Result<Self, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount_minor
            .checked_sub(other.amount_minor)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    fn ensure_same_currency(self, other: Self) -> Result<(), MoneyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                expected: self.currency,
                got: other.currency,
            })
        }
    }
}
