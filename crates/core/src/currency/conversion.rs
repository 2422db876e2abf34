//! Currency conversion logic.
//!
//! CRITICAL: Conversion rules:
//! - Same currency is the identity and the applied rate is forced to 1
//! - Cross-currency needs a positive rate (1 `from` = rate `to`)
//! - The result is rounded once, via [`round_to_minor`]

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::Currency;

use crate::error::ValidationError;
use crate::money::round_to_minor;

/// Result of converting an amount into another currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// Converted amount in minor units of the target currency.
    pub amount_minor: i64,
    /// Rate that was actually applied.
    pub rate: Decimal,
}

/// Converts `amount_minor` of `from` into minor units of `to`.
///
/// `resultMinor = round(amount_minor / 10^dp(from) * rate * 10^dp(to))`
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tripsplit_core::currency::convert;
/// use tripsplit_shared::types::Currency;
///
/// // 1000 JPY at 0.068 = 68.00 SEK
/// let result = convert(1000, Currency::Jpy, Currency::Sek, Some(dec!(0.068))).unwrap();
/// assert_eq!(result.amount_minor, 6800);
/// ```
pub fn convert(
    amount_minor: i64,
    from: Currency,
    to: Currency,
    rate: Option<Decimal>,
) -> Result<Conversion, ValidationError> {
    if from == to {
        return Ok(Conversion {
            amount_minor,
            rate: Decimal::ONE,
        });
    }

    let rate = rate.ok_or(ValidationError::MissingRate { from, to })?;
    if rate <= Decimal::ZERO {
        return Err(ValidationError::InvalidRate(rate));
    }

    let major = Decimal::new(amount_minor, from.decimal_places());
    let converted = major
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(Decimal::from(to.minor_per_major())))
        .and_then(round_to_minor)
        .ok_or_else(|| ValidationError::InvalidAmount(major.to_string()))?;

    Ok(Conversion {
        amount_minor: converted,
        rate,
    })
}

/// Picks the rate to use: a positive user rate wins over the default.
///
/// Returns `None` when neither is usable, in which case the user has to
/// enter a rate manually.
#[must_use]
pub fn resolve_rate(user_rate: Option<Decimal>, default_rate: Option<Decimal>) -> Option<Decimal> {
    user_rate
        .filter(|r| *r > Decimal::ZERO)
        .or_else(|| default_rate.filter(|r| *r > Decimal::ZERO))
}
