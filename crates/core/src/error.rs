//! Error types for the splitting engine.
//!
//! `ValidationError` covers bad user input and is raised where input is
//! accepted. `IntegrityError` means records that were already accepted no
//! longer satisfy a ledger invariant; it is always returned, never patched.

use rust_decimal::Decimal;
use thiserror::Error;
use tripsplit_shared::AppError;
use tripsplit_shared::types::{Currency, ExpenseId, ParticipantId, SettlementId};

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // ========== Amount Errors ==========
    /// Amount text could not be parsed.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Amount must be greater than zero.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    /// Currency code is not supported.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    // ========== Rate Errors ==========
    /// No rate was supplied for a cross-currency conversion.
    #[error("An exchange rate is required to convert {from} to {to}")]
    MissingRate {
        /// Source currency.
        from: Currency,
        /// Target currency.
        to: Currency,
    },

    /// Exchange rate must be positive.
    #[error("Exchange rate must be positive, got {0}")]
    InvalidRate(Decimal),

    // ========== Allocation Errors ==========
    /// A split needs at least one participant.
    #[error("At least one participant must be involved")]
    NoParticipants,

    /// A participant was listed twice.
    #[error("Participant {0} is listed more than once")]
    DuplicateParticipant(ParticipantId),

    /// The policy parameters have no entry for an involved participant.
    #[error("No share given for participant {0}")]
    MissingShare(ParticipantId),

    /// The policy parameters name someone who is not involved.
    #[error("Share given for participant {0} who is not involved")]
    UnknownParticipant(ParticipantId),

    /// An exact share was negative.
    #[error("Share for {participant} cannot be negative ({amount})")]
    NegativeShare {
        /// The participant.
        participant: ParticipantId,
        /// The offending amount.
        amount: i64,
    },

    /// Exact shares do not add up to the total.
    #[error("Shares add up to {actual}, expected {expected}")]
    AllocationMismatch {
        /// Total to be allocated.
        expected: i64,
        /// Sum of the supplied shares.
        actual: i64,
    },

    /// Percentages must add up to exactly 100.
    #[error("Percentages add up to {0}, expected 100")]
    PercentTotal(Decimal),

    /// A percentage was negative.
    #[error("Percentage for {0} cannot be negative")]
    NegativePercent(ParticipantId),

    /// A weight was negative.
    #[error("Weight for {0} cannot be negative")]
    NegativeWeight(ParticipantId),

    /// Weights must add up to a positive number.
    #[error("Weights must add up to a positive number")]
    ZeroWeightTotal,

    /// Split values are too large to add up.
    #[error("Split values are too large to add up")]
    SplitOverflow,

    // ========== Record Errors ==========
    /// Title or name is blank.
    #[error("{0} cannot be empty")]
    Blank(&'static str),

    /// Participant does not belong to the trip.
    #[error("{0} is not a member of this trip")]
    NotAMember(ParticipantId),

    /// A settlement cannot go from a participant to themselves.
    #[error("{0} cannot settle with themselves")]
    SelfTransfer(ParticipantId),

    /// Only trip admins may do this.
    #[error("{0} is not an admin of this trip")]
    NotAnAdmin(ParticipantId),

    /// Invite token did not match.
    #[error("Invite link is not valid for this trip")]
    InvalidInvite,

    /// Timezone is not a known IANA name.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

impl ValidationError {
    /// Returns the error code for display layers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            Self::MissingRate { .. } => "MISSING_RATE",
            Self::InvalidRate(_) => "INVALID_RATE",
            Self::NoParticipants => "NO_PARTICIPANTS",
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::MissingShare(_) => "MISSING_SHARE",
            Self::UnknownParticipant(_) => "UNKNOWN_PARTICIPANT",
            Self::NegativeShare { .. } => "NEGATIVE_SHARE",
            Self::AllocationMismatch { .. } => "ALLOCATION_MISMATCH",
            Self::PercentTotal(_) => "PERCENT_TOTAL",
            Self::NegativePercent(_) => "NEGATIVE_PERCENT",
            Self::NegativeWeight(_) => "NEGATIVE_WEIGHT",
            Self::ZeroWeightTotal => "ZERO_WEIGHT_TOTAL",
            Self::SplitOverflow => "SPLIT_OVERFLOW",
            Self::Blank(_) => "BLANK_FIELD",
            Self::NotAMember(_) => "NOT_A_MEMBER",
            Self::SelfTransfer(_) => "SELF_TRANSFER",
            Self::NotAnAdmin(_) => "NOT_AN_ADMIN",
            Self::InvalidInvite => "INVALID_INVITE",
            Self::UnknownTimezone(_) => "UNKNOWN_TIMEZONE",
        }
    }
}

/// Stored records that break a ledger invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// An expense's shares do not add up to its base amount.
    #[error("Expense {expense}: shares add up to {actual}, base amount is {expected}")]
    ExpenseShareMismatch {
        /// The expense.
        expense: ExpenseId,
        /// Stored base amount.
        expected: i64,
        /// Sum of stored shares.
        actual: i64,
    },

    /// A same-currency expense carries a rate other than 1.
    #[error("Expense {expense} is in its base currency but has rate {rate}")]
    SameCurrencyRate {
        /// The expense.
        expense: ExpenseId,
        /// Stored rate.
        rate: Decimal,
    },

    /// An expense has a non-positive amount, rate, or share.
    #[error("Expense {0} has a non-positive amount, rate, or a negative share")]
    InvalidExpense(ExpenseId),

    /// A settlement has a non-positive amount or pays itself.
    #[error("Settlement {0} has a non-positive amount or identical parties")]
    InvalidSettlement(SettlementId),

    /// Records are kept in more than one ledger currency.
    #[error("Ledger currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        /// The ledger currency.
        expected: Currency,
        /// The currency found on a record.
        got: Currency,
    },

    /// Net balances do not sum to zero.
    #[error("Net balances sum to {0} instead of zero")]
    Unbalanced(i64),

    /// Greedy matching left one side with outstanding balances.
    #[error("Settlement plan left {creditors} creditor(s) and {debtors} debtor(s) unmatched")]
    Unexhausted {
        /// Creditors with a remaining balance.
        creditors: usize,
        /// Debtors with a remaining balance.
        debtors: usize,
    },

    /// A collection was only partially read.
    #[error("The {0} collection was not read completely")]
    IncompleteSnapshot(&'static str),

    /// A running total exceeded the `i64` range.
    #[error("Amount overflow while summing the ledger")]
    Overflow,
}

impl IntegrityError {
    /// Returns the error code for display layers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ExpenseShareMismatch { .. } => "EXPENSE_SHARE_MISMATCH",
            Self::SameCurrencyRate { .. } => "SAME_CURRENCY_RATE",
            Self::InvalidExpense(_) => "INVALID_EXPENSE",
            Self::InvalidSettlement(_) => "INVALID_SETTLEMENT",
            Self::CurrencyMismatch { .. } => "LEDGER_CURRENCY_MISMATCH",
            Self::Unbalanced(_) => "UNBALANCED_LEDGER",
            Self::Unexhausted { .. } => "UNEXHAUSTED_SETTLEMENT_PLAN",
            Self::IncompleteSnapshot(_) => "INCOMPLETE_SNAPSHOT",
            Self::Overflow => "AMOUNT_OVERFLOW",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<IntegrityError> for AppError {
    fn from(err: IntegrityError) -> Self {
        Self::DataIntegrity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_user_facing_app_error() {
        let app: AppError = ValidationError::AllocationMismatch {
            expected: 100,
            actual: 90,
        }
        .into();
        assert!(app.is_user_facing());
        assert_eq!(
            app.to_string(),
            "Validation error: Shares add up to 90, expected 100"
        );
    }

    #[test]
    fn test_integrity_maps_to_data_integrity() {
        let app: AppError = IntegrityError::Unbalanced(3).into();
        assert_eq!(app.error_code(), "DATA_INTEGRITY_ERROR");
        assert!(!app.is_user_facing());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ValidationError::ZeroWeightTotal.error_code(), "ZERO_WEIGHT_TOTAL");
        assert_eq!(
            ValidationError::MissingRate {
                from: Currency::Jpy,
                to: Currency::Sek
            }
            .error_code(),
            "MISSING_RATE"
        );
        assert_eq!(
            IntegrityError::IncompleteSnapshot("expenses").error_code(),
            "INCOMPLETE_SNAPSHOT"
        );
    }
}
