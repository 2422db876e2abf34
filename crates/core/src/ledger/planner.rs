//! Settlement planning.
//!
//! Greedy matching of the largest creditor with the largest debtor. This
//! usually produces few transfers and never more than `participants - 1`,
//! but it is not a minimum-transfer solver: finding the true minimum is a
//! much harder combinatorial problem and the greedy plan is kept on purpose.

use tripsplit_shared::types::ParticipantId;

use super::balance::NetBalances;
use super::settlement::Transfer;
use crate::error::IntegrityError;

/// Suggests transfers that bring every balance to zero.
///
/// Creditors are served largest first and debtors most-negative first; equal
/// balances are ordered by participant ID so the plan is deterministic.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use tripsplit_core::ledger::{NetBalances, suggest_transfers};
///
/// let balances = NetBalances::from_map(BTreeMap::from([
///     ("A".into(), 20000),
///     ("B".into(), -10000),
///     ("C".into(), -10000),
/// ]));
/// let transfers = suggest_transfers(&balances).unwrap();
/// assert_eq!(transfers.len(), 2);
/// assert!(transfers.iter().all(|t| t.to.as_str() == "A" && t.amount_minor == 10000));
/// ```
pub fn suggest_transfers(balances: &NetBalances) -> Result<Vec<Transfer>, IntegrityError> {
    balances.ensure_balanced()?;

    let mut creditors: Vec<(ParticipantId, i64)> = balances
        .iter()
        .filter(|(_, b)| *b > 0)
        .map(|(p, b)| (p.clone(), b))
        .collect();
    let mut debtors: Vec<(ParticipantId, i64)> = balances
        .iter()
        .filter(|(_, b)| *b < 0)
        .map(|(p, b)| (p.clone(), b))
        .collect();

    // Stable sorts over id-ordered input keep ties in id order
    creditors.sort_by(|a, b| b.1.cmp(&a.1));
    debtors.sort_by(|a, b| a.1.cmp(&b.1));

    let mut transfers = Vec::with_capacity(creditors.len() + debtors.len());
    let (mut ci, mut di) = (0, 0);

    while ci < creditors.len() && di < debtors.len() {
        let (creditor, credit) = &mut creditors[ci];
        let (debtor, debt) = &mut debtors[di];

        let owed = debt.checked_neg().ok_or(IntegrityError::Overflow)?;
        let amount = (*credit).min(owed);
        transfers.push(Transfer {
            from: debtor.clone(),
            to: creditor.clone(),
            amount_minor: amount,
        });
        *credit -= amount;
        *debt += amount;

        if *credit == 0 {
            ci += 1;
        }
        if *debt == 0 {
            di += 1;
        }
    }

    if ci != creditors.len() || di != debtors.len() {
        return Err(IntegrityError::Unexhausted {
            creditors: creditors.len() - ci,
            debtors: debtors.len() - di,
        });
    }

    Ok(transfers)
}

/// Applies transfers to balances, as if every suggestion had been paid.
pub fn apply_transfers(
    balances: &NetBalances,
    transfers: &[Transfer],
) -> Result<NetBalances, IntegrityError> {
    let mut after = balances.clone();
    for transfer in transfers {
        after.credit(&transfer.from, transfer.amount_minor)?;
        after.debit(&transfer.to, transfer.amount_minor)?;
    }
    Ok(after)
}
