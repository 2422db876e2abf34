//! Property-based tests for share allocation.
//!
//! - Equal split sums to the total and no two shares differ by more than 1
//! - Exact shares that sum correctly pass through unchanged
//! - Percent and weight splits always sum to the total

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use tripsplit_shared::types::ParticipantId;

use super::allocator::{allocate, equal_split};
use super::policy::SplitPolicy;
use crate::error::ValidationError;

/// Strategy to generate positive totals in minor units.
fn positive_total() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy to generate 1..=12 distinct participants.
fn participants() -> impl Strategy<Value = Vec<ParticipantId>> {
    (1usize..=12).prop_map(|n| (0..n).map(|i| ParticipantId::new(format!("p{i}"))).collect())
}

/// Strategy to generate a total and random exact shares summing to it.
fn exact_split() -> impl Strategy<Value = (i64, Vec<ParticipantId>, Vec<i64>)> {
    prop::collection::vec(0i64..1_000_000, 1..=8).prop_map(|amounts| {
        let people = (0..amounts.len())
            .map(|i| ParticipantId::new(format!("p{i}")))
            .collect();
        let total = amounts.iter().sum::<i64>();
        (total, people, amounts)
    })
}

/// Strategy to generate weights (1..10 entries, 0..100 each, not all zero).
fn weights() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..100, 1..10).prop_filter("weights sum positive", |w| {
        w.iter().sum::<u32>() > 0
    })
}

fn keyed<V: Clone>(people: &[ParticipantId], values: &[V]) -> BTreeMap<ParticipantId, V> {
    people.iter().cloned().zip(values.iter().cloned()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Equal split shares add up to the total exactly.
    #[test]
    fn prop_equal_split_sum_invariant(
        total in positive_total(),
        people in participants(),
    ) {
        let shares = equal_split(total, &people).unwrap();
        prop_assert_eq!(shares.len(), people.len());
        prop_assert_eq!(shares.values().sum::<i64>(), total);
    }

    /// Equal split shares differ by at most one minor unit, and the larger
    /// shares go to the participants listed first.
    #[test]
    fn prop_equal_split_spread_and_order(
        total in positive_total(),
        people in participants(),
    ) {
        let shares = equal_split(total, &people).unwrap();
        let ordered: Vec<i64> = people.iter().map(|p| shares[p]).collect();
        let max = *ordered.iter().max().unwrap();
        let min = *ordered.iter().min().unwrap();
        prop_assert!(max - min <= 1);
        prop_assert!(ordered.windows(2).all(|w| w[0] >= w[1]));
    }

    /// Exact shares that add up to the total come back unchanged.
    #[test]
    fn prop_exact_passthrough((total, people, amounts) in exact_split()) {
        prop_assume!(total > 0);
        let policy = SplitPolicy::Exact(keyed(&people, &amounts));
        let shares = allocate(total, &policy, &people).unwrap();
        let back: Vec<i64> = people.iter().map(|p| shares[p]).collect();
        prop_assert_eq!(back, amounts);
    }

    /// Exact shares that do not add up are rejected.
    #[test]
    fn prop_exact_mismatch_rejected(
        (total, people, amounts) in exact_split(),
        delta in prop_oneof![-50i64..0, 1i64..50],
    ) {
        prop_assume!(total + delta > 0);
        let policy = SplitPolicy::Exact(keyed(&people, &amounts));
        let result = allocate(total + delta, &policy, &people);
        let is_mismatch = matches!(result, Err(ValidationError::AllocationMismatch { .. }));
        prop_assert!(is_mismatch);
    }

    /// Weighted shares add up to the total and are never negative.
    #[test]
    fn prop_weights_sum_invariant(
        total in positive_total(),
        raw in weights(),
    ) {
        let people: Vec<ParticipantId> =
            (0..raw.len()).map(|i| ParticipantId::new(format!("p{i}"))).collect();
        let values: Vec<Decimal> = raw.iter().map(|w| Decimal::from(*w)).collect();
        let policy = SplitPolicy::Weights(keyed(&people, &values));
        let shares = allocate(total, &policy, &people).unwrap();
        prop_assert_eq!(shares.values().sum::<i64>(), total);
        prop_assert!(shares.values().all(|s| *s >= 0));
    }

    /// Percent shares normalized to 100 add up to the total.
    #[test]
    fn prop_percent_sum_invariant(
        total in positive_total(),
        raw in prop::collection::vec(1u32..100, 1..10),
    ) {
        // Turn raw values into two-decimal percents that sum to exactly 100
        let sum: u32 = raw.iter().sum();
        let mut percents: Vec<Decimal> = raw
            .iter()
            .map(|v| {
                (Decimal::from(*v) * Decimal::ONE_HUNDRED / Decimal::from(sum))
                    .round_dp_with_strategy(2, RoundingStrategy::ToZero)
            })
            .collect();
        let drift = Decimal::ONE_HUNDRED - percents.iter().copied().sum::<Decimal>();
        percents[0] += drift;

        let people: Vec<ParticipantId> =
            (0..raw.len()).map(|i| ParticipantId::new(format!("p{i}"))).collect();
        let policy = SplitPolicy::Percent(keyed(&people, &percents));
        let shares = allocate(total, &policy, &people).unwrap();
        prop_assert_eq!(shares.values().sum::<i64>(), total);
    }
}
