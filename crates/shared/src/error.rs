//! Application-wide error types.
//!
//! Three families matter to the ledger:
//! - validation failures caught where user input is accepted,
//! - data-integrity failures that point at upstream corruption,
//! - external-service failures that callers recover from locally.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// User input was rejected.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Stored records violate a ledger invariant.
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns a stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DataIntegrity(_) => "DATA_INTEGRITY_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the message can be shown to the user as-is.
    ///
    /// Rejected input and missing trips are; everything else is logged and
    /// replaced by a generic message.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
