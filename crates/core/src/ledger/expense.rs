//! Expense records.
//!
//! An expense is computed once from a draft: the amount is converted into the
//! trip's base currency and the base total is allocated across the involved
//! participants. The stored `split_base` always sums to `base_amount_minor`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::{Currency, ExpenseId, ParticipantId};

use crate::allocation::{Shares, SplitMode, SplitPolicy, allocate};
use crate::currency::{convert, resolve_rate};
use crate::error::{IntegrityError, ValidationError};
use crate::trip::Trip;

/// User input for creating or editing an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    /// What was paid for.
    pub title: String,
    /// Day of the purchase.
    pub date: NaiveDate,
    /// Currency the expense was paid in.
    pub currency: Currency,
    /// Amount paid, in minor units of `currency`.
    pub amount_minor: i64,
    /// Rate typed by the user (1 `currency` = rate base currency).
    pub rate: Option<Decimal>,
    /// Who paid.
    pub paid_by: ParticipantId,
    /// Who shares the cost, in display order.
    pub involved: Vec<ParticipantId>,
    /// How the cost is shared.
    pub policy: SplitPolicy,
}

/// A computed expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// What was paid for.
    pub title: String,
    /// Day of the purchase.
    pub date: NaiveDate,
    /// Currency the expense was paid in.
    pub expense_currency: Currency,
    /// Amount paid, in minor units of `expense_currency`.
    pub amount_original_minor: i64,
    /// Trip ledger currency.
    pub base_currency: Currency,
    /// Converted total, in minor units of `base_currency`.
    pub base_amount_minor: i64,
    /// Applied rate; exactly 1 when no conversion was needed.
    pub rate_to_base: Decimal,
    /// Who paid.
    pub paid_by: ParticipantId,
    /// Who shares the cost.
    pub involved: Vec<ParticipantId>,
    /// Policy used for the split.
    pub split_mode: SplitMode,
    /// Share per involved participant, in base minor units.
    pub split_base: Shares,
    /// Who entered the expense.
    pub created_by: ParticipantId,
    /// Who last edited the expense, if anyone did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_by: Option<ParticipantId>,
}

impl Expense {
    /// Builds an expense from a draft.
    ///
    /// `default_rate` is the fetched rate for the day, used only when the
    /// draft carries no positive rate of its own.
    pub fn compute(
        draft: ExpenseDraft,
        trip: &Trip,
        default_rate: Option<Decimal>,
        author: &ParticipantId,
    ) -> Result<Self, ValidationError> {
        Self::compute_with_id(ExpenseId::new(), draft, trip, default_rate, author)
    }

    /// Recomputes this expense from an edited draft.
    ///
    /// The ID and original author are kept; `editor` is recorded as the last
    /// editor and must be a member.
    pub fn revise(
        &self,
        draft: ExpenseDraft,
        trip: &Trip,
        default_rate: Option<Decimal>,
        editor: &ParticipantId,
    ) -> Result<Self, ValidationError> {
        let mut revised = Self::compute_with_id(self.id, draft, trip, default_rate, editor)?;
        revised.created_by.clone_from(&self.created_by);
        revised.edited_by = Some(editor.clone());
        Ok(revised)
    }

    fn compute_with_id(
        id: ExpenseId,
        draft: ExpenseDraft,
        trip: &Trip,
        default_rate: Option<Decimal>,
        author: &ParticipantId,
    ) -> Result<Self, ValidationError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(ValidationError::Blank("Title"));
        }
        if draft.amount_minor <= 0 {
            return Err(ValidationError::NonPositiveAmount(draft.amount_minor));
        }
        trip.require_member(author)?;
        trip.require_member(&draft.paid_by)?;
        if draft.involved.is_empty() {
            return Err(ValidationError::NoParticipants);
        }
        for participant in &draft.involved {
            trip.require_member(participant)?;
        }

        let base_currency = trip.base_currency;
        let rate = resolve_rate(draft.rate, default_rate);
        let conversion = convert(draft.amount_minor, draft.currency, base_currency, rate)?;
        if conversion.amount_minor <= 0 {
            return Err(ValidationError::NonPositiveAmount(conversion.amount_minor));
        }

        let split_base = split_in_base(&draft, base_currency, conversion.amount_minor)?;

        Ok(Self {
            id,
            title: title.to_string(),
            date: draft.date,
            expense_currency: draft.currency,
            amount_original_minor: draft.amount_minor,
            base_currency,
            base_amount_minor: conversion.amount_minor,
            rate_to_base: conversion.rate,
            paid_by: draft.paid_by,
            involved: draft.involved,
            split_mode: draft.policy.mode(),
            split_base,
            created_by: author.clone(),
            edited_by: None,
        })
    }

    /// Re-checks the stored invariants of an expense read back from storage.
    pub fn verify(&self) -> Result<(), IntegrityError> {
        if self.amount_original_minor <= 0
            || self.base_amount_minor <= 0
            || self.rate_to_base <= Decimal::ZERO
            || self.split_base.values().any(|share| *share < 0)
        {
            return Err(IntegrityError::InvalidExpense(self.id));
        }
        if self.expense_currency == self.base_currency && self.rate_to_base != Decimal::ONE {
            return Err(IntegrityError::SameCurrencyRate {
                expense: self.id,
                rate: self.rate_to_base,
            });
        }

        let actual = self
            .split_base
            .values()
            .try_fold(0i64, |acc, share| acc.checked_add(*share))
            .ok_or(IntegrityError::Overflow)?;
        if actual != self.base_amount_minor {
            return Err(IntegrityError::ExpenseShareMismatch {
                expense: self.id,
                expected: self.base_amount_minor,
                actual,
            });
        }
        Ok(())
    }

    /// The payer's own share, zero if they are not involved.
    #[must_use]
    pub fn payer_share(&self) -> i64 {
        self.split_base.get(&self.paid_by).copied().unwrap_or(0)
    }
}

/// Allocates the converted total.
///
/// Exact shares are entered in the expense currency and must add up to the
/// original amount. When a conversion happened they are re-applied to the base
/// total as weights, so the base shares still add up exactly.
fn split_in_base(
    draft: &ExpenseDraft,
    base_currency: Currency,
    base_amount_minor: i64,
) -> Result<Shares, ValidationError> {
    match &draft.policy {
        SplitPolicy::Exact(_) if draft.currency != base_currency => {
            let original = allocate(draft.amount_minor, &draft.policy, &draft.involved)?;
            let weights = original
                .into_iter()
                .map(|(participant, amount)| (participant, Decimal::from(amount)))
                .collect();
            allocate(base_amount_minor, &SplitPolicy::Weights(weights), &draft.involved)
        }
        policy => allocate(base_amount_minor, policy, &draft.involved),
    }
}
