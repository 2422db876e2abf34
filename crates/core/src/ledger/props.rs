//! Property-based tests for balances and settlement plans.
//!
//! - Net balances sum to zero for any valid expenses and settlements
//! - Suggested transfers zero every balance, using at most n - 1 transfers
//! - Recomputing on the same snapshot gives identical output

use chrono::NaiveDate;
use proptest::prelude::*;
use tripsplit_shared::types::{Currency, ParticipantId};

use super::balance::compute_net_balances;
use super::expense::{Expense, ExpenseDraft};
use super::planner::{apply_transfers, suggest_transfers};
use super::settlement::Settlement;
use crate::allocation::SplitPolicy;
use crate::trip::Trip;

const MAX_MEMBERS: usize = 8;

fn member(i: usize) -> ParticipantId {
    ParticipantId::new(format!("m{i}"))
}

fn trip_with(count: usize) -> Trip {
    let mut trip = Trip::create("Props", Currency::Sek, member(0)).unwrap();
    trip.members.extend((1..count).map(member));
    trip
}

/// (payer index, amount, involvement bitmask)
fn raw_expense() -> impl Strategy<Value = (usize, i64, u8)> {
    (0usize..MAX_MEMBERS, 1i64..5_000_000, 1u8..=255)
}

/// (from index, to index, amount)
fn raw_settlement() -> impl Strategy<Value = (usize, usize, i64)> {
    (0usize..MAX_MEMBERS, 0usize..MAX_MEMBERS, 1i64..1_000_000)
}

fn build_expenses(trip: &Trip, raw: &[(usize, i64, u8)]) -> Vec<Expense> {
    let count = trip.members.len();
    raw.iter()
        .map(|(payer, amount, mask)| {
            let mut involved: Vec<ParticipantId> = (0..count)
                .filter(|i| mask & (1u8 << (i % 8)) != 0)
                .map(member)
                .collect();
            if involved.is_empty() {
                involved.push(member(0));
            }
            let payer = member(payer % count);
            let draft = ExpenseDraft {
                title: "Generated".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
                currency: Currency::Sek,
                amount_minor: *amount,
                rate: None,
                paid_by: payer.clone(),
                involved,
                policy: SplitPolicy::Equal,
            };
            Expense::compute(draft, trip, None, &payer).unwrap()
        })
        .collect()
}

fn build_settlements(trip: &Trip, raw: &[(usize, usize, i64)]) -> Vec<Settlement> {
    let count = trip.members.len();
    raw.iter()
        .filter(|(from, to, _)| from % count != to % count)
        .map(|(from, to, amount)| {
            Settlement::new(
                member(from % count),
                member(to % count),
                *amount,
                Currency::Sek,
                member(from % count),
            )
            .unwrap()
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Net balances always sum to exactly zero.
    #[test]
    fn prop_balances_sum_to_zero(
        count in 1usize..=MAX_MEMBERS,
        expenses in prop::collection::vec(raw_expense(), 0..30),
        settlements in prop::collection::vec(raw_settlement(), 0..10),
    ) {
        let trip = trip_with(count);
        let expenses = build_expenses(&trip, &expenses);
        let settlements = build_settlements(&trip, &settlements);
        let balances = compute_net_balances(&expenses, &settlements, &trip.members).unwrap();
        prop_assert_eq!(balances.total().unwrap(), 0);
    }

    /// Applying the suggested transfers settles everyone, with at most n - 1 transfers.
    #[test]
    fn prop_transfers_zero_all_balances(
        count in 1usize..=MAX_MEMBERS,
        expenses in prop::collection::vec(raw_expense(), 0..30),
        settlements in prop::collection::vec(raw_settlement(), 0..10),
    ) {
        let trip = trip_with(count);
        let expenses = build_expenses(&trip, &expenses);
        let settlements = build_settlements(&trip, &settlements);
        let balances = compute_net_balances(&expenses, &settlements, &trip.members).unwrap();

        let transfers = suggest_transfers(&balances).unwrap();
        prop_assert!(transfers.len() <= balances.len().saturating_sub(1));
        prop_assert!(transfers.iter().all(|t| t.amount_minor > 0 && t.from != t.to));

        let credit_total: i64 = balances.iter().map(|(_, b)| b.max(0)).sum();
        let moved: i64 = transfers.iter().map(|t| t.amount_minor).sum();
        prop_assert_eq!(moved, credit_total);

        prop_assert!(apply_transfers(&balances, &transfers).unwrap().is_settled());
    }

    /// Running the whole computation twice on the same input gives the same output.
    #[test]
    fn prop_recomputation_is_idempotent(
        count in 1usize..=MAX_MEMBERS,
        expenses in prop::collection::vec(raw_expense(), 0..20),
    ) {
        let trip = trip_with(count);
        let expenses = build_expenses(&trip, &expenses);
        let first = compute_net_balances(&expenses, &[], &trip.members).unwrap();
        let second = compute_net_balances(&expenses, &[], &trip.members).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(suggest_transfers(&first).unwrap(), suggest_transfers(&second).unwrap());
    }

    /// Recording every suggested transfer as a settlement settles the trip.
    #[test]
    fn prop_confirmed_transfers_settle_the_trip(
        count in 2usize..=MAX_MEMBERS,
        expenses in prop::collection::vec(raw_expense(), 1..20),
    ) {
        let trip = trip_with(count);
        let expenses = build_expenses(&trip, &expenses);
        let balances = compute_net_balances(&expenses, &[], &trip.members).unwrap();
        let settlements: Vec<Settlement> = suggest_transfers(&balances)
            .unwrap()
            .iter()
            .map(|t| Settlement::confirm(t, Currency::Sek, t.from.clone()).unwrap())
            .collect();

        let after = compute_net_balances(&expenses, &settlements, &trip.members).unwrap();
        prop_assert!(after.is_settled());
    }
}
