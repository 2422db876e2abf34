//! Read-side view over one trip.
//!
//! A snapshot is everything the store currently holds for a trip. The summary
//! built from it is recomputed from scratch on every change and carries no
//! state of its own.

use serde::{Deserialize, Serialize};
use tripsplit_shared::types::{Currency, ParticipantId};

use super::types::Trip;
use crate::error::IntegrityError;
use crate::ledger::{Expense, NetBalances, Settlement, Transfer, compute_net_balances, suggest_transfers};

/// The records of one collection, as delivered by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection<T> {
    /// Every record the store returned.
    pub items: Vec<T>,
    /// False when the read stopped early (for example at a page limit).
    #[serde(default = "fully_read")]
    pub complete: bool,
}

const fn fully_read() -> bool {
    true
}

impl<T> Collection<T> {
    /// A collection holding every record.
    #[must_use]
    pub const fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            complete: true,
        }
    }

    /// A collection that is known to be missing records.
    #[must_use]
    pub const fn partial(items: Vec<T>) -> Self {
        Self {
            items,
            complete: false,
        }
    }

    fn require_complete(&self, name: &'static str) -> Result<&[T], IntegrityError> {
        if self.complete {
            Ok(&self.items)
        } else {
            Err(IntegrityError::IncompleteSnapshot(name))
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::complete(Vec::new())
    }
}

/// A trip with the current contents of its collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSnapshot {
    /// The trip record, including its members.
    pub trip: Trip,
    /// Every expense on the trip.
    #[serde(default)]
    pub expenses: Collection<Expense>,
    /// Every recorded settlement.
    #[serde(default)]
    pub settlements: Collection<Settlement>,
}

impl TripSnapshot {
    /// An empty snapshot for a freshly created trip.
    #[must_use]
    pub fn new(trip: Trip) -> Self {
        Self {
            trip,
            expenses: Collection::default(),
            settlements: Collection::default(),
        }
    }
}

/// Where the viewing participant stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerPosition {
    /// The viewer.
    pub participant: ParticipantId,
    /// Net balance in base minor units.
    pub net_minor: i64,
    /// Suggested transfers the viewer should pay.
    pub owes: Vec<Transfer>,
    /// Suggested transfers the viewer should receive.
    pub owed: Vec<Transfer>,
}

/// Balances and suggested transfers for a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSummary {
    /// Currency all amounts are in.
    pub currency: Currency,
    /// Net balance per participant.
    pub balances: NetBalances,
    /// Greedy settlement plan.
    pub transfers: Vec<Transfer>,
    /// The viewer's own position, when a viewer was given.
    pub viewer: Option<ViewerPosition>,
}

/// Computes balances and the settlement plan for a snapshot.
///
/// Refuses to run on a snapshot with an incomplete collection, and on records
/// kept in a currency other than the trip's base currency.
pub fn summarize(
    snapshot: &TripSnapshot,
    viewer: Option<&ParticipantId>,
) -> Result<TripSummary, IntegrityError> {
    let expenses = snapshot.expenses.require_complete("expenses")?;
    let settlements = snapshot.settlements.require_complete("settlements")?;
    let currency = snapshot.trip.base_currency;

    let foreign = expenses
        .iter()
        .map(|e| e.base_currency)
        .chain(settlements.iter().map(|s| s.currency))
        .find(|c| *c != currency);
    if let Some(got) = foreign {
        return Err(IntegrityError::CurrencyMismatch {
            expected: currency,
            got,
        });
    }

    let balances = compute_net_balances(expenses, settlements, &snapshot.trip.members)?;
    let transfers = suggest_transfers(&balances)?;

    let viewer = viewer.map(|participant| ViewerPosition {
        participant: participant.clone(),
        net_minor: balances.get(participant),
        owes: transfers
            .iter()
            .filter(|t| &t.from == participant)
            .cloned()
            .collect(),
        owed: transfers
            .iter()
            .filter(|t| &t.to == participant)
            .cloned()
            .collect(),
    });

    Ok(TripSummary {
        currency,
        balances,
        transfers,
        viewer,
    })
}
