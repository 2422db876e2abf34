//! Net balance calculation.
//!
//! A positive balance means the participant is owed money, a negative one
//! means they owe. Balances are a pure fold over every expense and every
//! settlement, so they always sum to zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tripsplit_shared::types::{Currency, ParticipantId};

use super::expense::Expense;
use super::settlement::Settlement;
use crate::error::IntegrityError;

/// Signed position per participant, in base-currency minor units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetBalances(BTreeMap<ParticipantId, i64>);

impl NetBalances {
    /// Builds balances from explicit values.
    #[must_use]
    pub fn from_map(balances: BTreeMap<ParticipantId, i64>) -> Self {
        Self(balances)
    }

    /// Balance of `participant`, zero if unknown.
    #[must_use]
    pub fn get(&self, participant: &ParticipantId) -> i64 {
        self.0.get(participant).copied().unwrap_or(0)
    }

    /// Iterates balances ordered by participant.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, i64)> {
        self.0.iter().map(|(p, b)| (p, *b))
    }

    /// Number of participants with a balance entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no participant has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances; zero for consistent data.
    pub fn total(&self) -> Result<i64, IntegrityError> {
        self.0
            .values()
            .try_fold(0i64, |acc, b| acc.checked_add(*b))
            .ok_or(IntegrityError::Overflow)
    }

    /// Fails unless the balances sum to exactly zero.
    pub fn ensure_balanced(&self) -> Result<(), IntegrityError> {
        match self.total()? {
            0 => Ok(()),
            total => Err(IntegrityError::Unbalanced(total)),
        }
    }

    /// Returns true if nobody owes anything.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.0.values().all(|b| *b == 0)
    }

    /// Consumes the balances, returning the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<ParticipantId, i64> {
        self.0
    }

    pub(super) fn credit(&mut self, participant: &ParticipantId, amount: i64) -> Result<(), IntegrityError> {
        let entry = self.0.entry(participant.clone()).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(IntegrityError::Overflow)?;
        Ok(())
    }

    pub(super) fn debit(&mut self, participant: &ParticipantId, amount: i64) -> Result<(), IntegrityError> {
        let entry = self.0.entry(participant.clone()).or_insert(0);
        *entry = entry.checked_sub(amount).ok_or(IntegrityError::Overflow)?;
        Ok(())
    }
}

/// Folds every expense and settlement into a net position per participant.
///
/// Every member starts at zero. Participants that appear on records but are
/// no longer members keep their balance so no money disappears. Each record
/// is verified first, and all records must share one ledger currency.
///
/// The caller must pass complete collections: a partial read still produces
/// a plausible-looking but wrong result.
pub fn compute_net_balances(
    expenses: &[Expense],
    settlements: &[Settlement],
    members: &[ParticipantId],
) -> Result<NetBalances, IntegrityError> {
    let mut balances = NetBalances::default();
    for member in members {
        balances.0.entry(member.clone()).or_insert(0);
    }

    let mut ledger_currency: Option<Currency> = None;
    let mut check_currency = |currency: Currency| match ledger_currency {
        Some(expected) if expected != currency => Err(IntegrityError::CurrencyMismatch {
            expected,
            got: currency,
        }),
        _ => {
            ledger_currency = Some(currency);
            Ok(())
        }
    };

    for expense in expenses {
        expense.verify()?;
        check_currency(expense.base_currency)?;

        // The payer fronted the whole amount
        balances.credit(&expense.paid_by, expense.base_amount_minor)?;
        for (participant, share) in &expense.split_base {
            balances.debit(participant, *share)?;
        }
    }

    for settlement in settlements {
        settlement.verify()?;
        check_currency(settlement.currency)?;

        balances.credit(&settlement.from, settlement.amount_minor)?;
        balances.debit(&settlement.to, settlement.amount_minor)?;
    }

    balances.ensure_balanced()?;
    Ok(balances)
}
