//! Transfers and recorded settlements.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::{Currency, ParticipantId, SettlementId};

use crate::error::{IntegrityError, ValidationError};

/// A suggested payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
    /// Who pays.
    pub from: ParticipantId,
    /// Who receives.
    pub to: ParticipantId,
    /// Amount in base-currency minor units.
    pub amount_minor: i64,
}

/// A real-world payment that already happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Settlement ID.
    pub id: SettlementId,
    /// Who paid.
    pub from: ParticipantId,
    /// Who received.
    pub to: ParticipantId,
    /// Amount in base-currency minor units.
    pub amount_minor: i64,
    /// Trip base currency.
    pub currency: Currency,
    /// Day the payment was made, if known.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Who recorded the payment.
    pub recorded_by: ParticipantId,
}

impl Settlement {
    /// Records a payment between two participants.
    pub fn new(
        from: ParticipantId,
        to: ParticipantId,
        amount_minor: i64,
        currency: Currency,
        recorded_by: ParticipantId,
    ) -> Result<Self, ValidationError> {
        if amount_minor <= 0 {
            return Err(ValidationError::NonPositiveAmount(amount_minor));
        }
        if from == to {
            return Err(ValidationError::SelfTransfer(from));
        }
        Ok(Self {
            id: SettlementId::new(),
            from,
            to,
            amount_minor,
            currency,
            date: None,
            recorded_by,
        })
    }

    /// Records a suggested transfer that the user confirmed as paid.
    pub fn confirm(
        transfer: &Transfer,
        currency: Currency,
        recorded_by: ParticipantId,
    ) -> Result<Self, ValidationError> {
        Self::new(
            transfer.from.clone(),
            transfer.to.clone(),
            transfer.amount_minor,
            currency,
            recorded_by,
        )
    }

    /// Sets the day the payment was made.
    #[must_use]
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Re-checks a settlement read back from storage.
    pub fn verify(&self) -> Result<(), IntegrityError> {
        if self.amount_minor <= 0 || self.from == self.to {
            return Err(IntegrityError::InvalidSettlement(self.id));
        }
        Ok(())
    }
}
