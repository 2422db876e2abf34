//! Rate acquisition errors.

use rust_decimal::Decimal;
use thiserror::Error;
use tripsplit_shared::AppError;
use tripsplit_shared::types::Currency;

/// Failure to obtain a default exchange rate.
#[derive(Debug, Error)]
pub enum RateError {
    /// The HTTP request itself failed (connect, timeout, body).
    #[error("Rate request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The rate service answered with a non-success status.
    #[error("Rate service answered with status {0}")]
    Status(u16),

    /// The response did not contain the requested pair.
    #[error("Rate response has no rate for {from} to {to}")]
    MissingRate {
        /// Source currency.
        from: Currency,
        /// Target currency.
        to: Currency,
    },

    /// The rate value could not be read as a decimal.
    #[error("Unreadable rate value: {0}")]
    Malformed(String),

    /// The service returned zero or a negative rate.
    #[error("Rate must be positive, got {0}")]
    NonPositive(Decimal),
}

impl RateError {
    /// Returns a stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Http(_) => "RATE_HTTP_ERROR",
            Self::Status(_) => "RATE_HTTP_STATUS",
            Self::MissingRate { .. } => "RATE_MISSING",
            Self::Malformed(_) => "RATE_MALFORMED",
            Self::NonPositive(_) => "RATE_NON_POSITIVE",
        }
    }
}

impl From<RateError> for AppError {
    fn from(err: RateError) -> Self {
        Self::ExternalService(err.to_string())
    }
}
