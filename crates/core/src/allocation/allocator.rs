//! Amount allocation using equal split and the Largest Remainder Method.
//!
//! The Largest Remainder Method works by:
//! 1. Calculate each participant's exact fractional share
//! 2. Round each share down to whole minor units
//! 3. Calculate the remainder (total - sum of floors)
//! 4. Hand out the remainder one unit at a time, largest fraction first,
//!    ties going to the participant listed first

use std::collections::{BTreeMap, HashSet};

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use tripsplit_shared::types::ParticipantId;

use super::policy::SplitPolicy;
use crate::error::ValidationError;

/// Minor-unit share per participant.
pub type Shares = BTreeMap<ParticipantId, i64>;

/// Distributes `total_minor` across `participants` under `policy`.
///
/// The returned shares contain exactly the given participants and add up to
/// `total_minor`.
///
/// # Example
///
/// ```
/// use tripsplit_core::allocation::{SplitPolicy, allocate};
/// use tripsplit_shared::types::ParticipantId;
///
/// let people: Vec<ParticipantId> = ["a", "b", "c"].into_iter().map(Into::into).collect();
/// let shares = allocate(100, &SplitPolicy::Equal, &people).unwrap();
/// assert_eq!(shares.values().sum::<i64>(), 100);
/// assert_eq!(shares[&people[0]], 34);
/// ```
pub fn allocate(
    total_minor: i64,
    policy: &SplitPolicy,
    participants: &[ParticipantId],
) -> Result<Shares, ValidationError> {
    if total_minor <= 0 {
        return Err(ValidationError::NonPositiveAmount(total_minor));
    }
    validate_participants(participants)?;

    match policy {
        SplitPolicy::Equal => Ok(zip_shares(participants, split_evenly(total_minor, participants.len()))),
        SplitPolicy::Exact(amounts) => allocate_exact(total_minor, amounts, participants),
        SplitPolicy::Percent(percents) => allocate_by_percent(total_minor, percents, participants),
        SplitPolicy::Weights(weights) => allocate_by_weights(total_minor, weights, participants),
    }
}

/// Splits `total_minor` equally; the first `total % n` participants in input
/// order get one extra minor unit.
pub fn equal_split(
    total_minor: i64,
    participants: &[ParticipantId],
) -> Result<Shares, ValidationError> {
    allocate(total_minor, &SplitPolicy::Equal, participants)
}

fn validate_participants(participants: &[ParticipantId]) -> Result<(), ValidationError> {
    if participants.is_empty() {
        return Err(ValidationError::NoParticipants);
    }
    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant) {
            return Err(ValidationError::DuplicateParticipant(participant.clone()));
        }
    }
    Ok(())
}

/// Params must name exactly the participant set.
fn check_params_cover<V>(
    params: &BTreeMap<ParticipantId, V>,
    participants: &[ParticipantId],
) -> Result<(), ValidationError> {
    if let Some(missing) = participants.iter().find(|p| !params.contains_key(*p)) {
        return Err(ValidationError::MissingShare(missing.clone()));
    }
    if let Some(extra) = params.keys().find(|k| !participants.contains(k)) {
        return Err(ValidationError::UnknownParticipant(extra.clone()));
    }
    Ok(())
}

fn zip_shares(participants: &[ParticipantId], amounts: Vec<i64>) -> Shares {
    participants.iter().cloned().zip(amounts).collect()
}

fn split_evenly(total_minor: i64, count: usize) -> Vec<i64> {
    let count_i64 = i64::try_from(count).unwrap_or(i64::MAX);
    let base = total_minor.div_euclid(count_i64);
    let remainder = usize::try_from(total_minor - base * count_i64).unwrap_or(0);

    // First N participants get the extra unit
    (0..count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

fn allocate_exact(
    total_minor: i64,
    amounts: &BTreeMap<ParticipantId, i64>,
    participants: &[ParticipantId],
) -> Result<Shares, ValidationError> {
    check_params_cover(amounts, participants)?;

    let mut sum: i64 = 0;
    for participant in participants {
        let amount = amounts[participant];
        if amount < 0 {
            return Err(ValidationError::NegativeShare {
                participant: participant.clone(),
                amount,
            });
        }
        sum = sum.checked_add(amount).ok_or(ValidationError::SplitOverflow)?;
    }

    if sum != total_minor {
        return Err(ValidationError::AllocationMismatch {
            expected: total_minor,
            actual: sum,
        });
    }

    Ok(participants
        .iter()
        .map(|p| (p.clone(), amounts[p]))
        .collect())
}

fn allocate_by_percent(
    total_minor: i64,
    percents: &BTreeMap<ParticipantId, Decimal>,
    participants: &[ParticipantId],
) -> Result<Shares, ValidationError> {
    check_params_cover(percents, participants)?;

    if let Some(negative) = participants.iter().find(|p| percents[*p] < Decimal::ZERO) {
        return Err(ValidationError::NegativePercent(negative.clone()));
    }
    let percent_total = checked_total(percents, participants)?;
    if percent_total != Decimal::ONE_HUNDRED {
        return Err(ValidationError::PercentTotal(percent_total));
    }

    let ratios: Vec<Decimal> = participants.iter().map(|p| percents[p]).collect();
    let amounts = largest_remainder(total_minor, &ratios, Decimal::ONE_HUNDRED)?;
    Ok(zip_shares(participants, amounts))
}

fn allocate_by_weights(
    total_minor: i64,
    weights: &BTreeMap<ParticipantId, Decimal>,
    participants: &[ParticipantId],
) -> Result<Shares, ValidationError> {
    check_params_cover(weights, participants)?;

    if let Some(negative) = participants.iter().find(|p| weights[*p] < Decimal::ZERO) {
        return Err(ValidationError::NegativeWeight(negative.clone()));
    }
    let weight_total = checked_total(weights, participants)?;
    if weight_total <= Decimal::ZERO {
        return Err(ValidationError::ZeroWeightTotal);
    }

    let ratios: Vec<Decimal> = participants.iter().map(|p| weights[p]).collect();
    let amounts = largest_remainder(total_minor, &ratios, weight_total)?;
    Ok(zip_shares(participants, amounts))
}

fn checked_total(
    values: &BTreeMap<ParticipantId, Decimal>,
    participants: &[ParticipantId],
) -> Result<Decimal, ValidationError> {
    participants
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(values[p]))
        .ok_or(ValidationError::SplitOverflow)
}

/// Splits `total_minor` in proportion `ratios[i] / denominator`.
fn largest_remainder(
    total_minor: i64,
    ratios: &[Decimal],
    denominator: Decimal,
) -> Result<Vec<i64>, ValidationError> {
    let total = Decimal::from(total_minor);

    // Exact fractional shares
    let exact = ratios
        .iter()
        .map(|r| {
            total
                .checked_mul(*r)
                .and_then(|v| v.checked_div(denominator))
                .ok_or(ValidationError::SplitOverflow)
        })
        .collect::<Result<Vec<Decimal>, _>>()?;

    // Round down each
    let mut floors = exact
        .iter()
        .map(|e| e.floor().to_i64().ok_or(ValidationError::SplitOverflow))
        .collect::<Result<Vec<i64>, _>>()?;

    let leftover = total_minor - floors.iter().sum::<i64>();
    debug_assert!(leftover >= 0, "floors cannot exceed the total");
    let leftover = usize::try_from(leftover).unwrap_or(0);
    if leftover == 0 {
        return Ok(floors);
    }

    // Largest fraction first; stable sort keeps input order on ties
    let mut order: Vec<usize> = (0..exact.len()).collect();
    order.sort_by(|&a, &b| exact[b].fract().cmp(&exact[a].fract()));

    for &idx in order.iter().cycle().take(leftover) {
        floors[idx] += 1;
    }

    Ok(floors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn people(ids: &[&str]) -> Vec<ParticipantId> {
        ids.iter().map(|id| ParticipantId::from(*id)).collect()
    }

    fn amounts(shares: &Shares, participants: &[ParticipantId]) -> Vec<i64> {
        participants.iter().map(|p| shares[p]).collect()
    }

    // =========================================================================
    // Equal split
    // =========================================================================

    #[test]
    fn test_equal_split_100_by_3_gives_extra_to_first() {
        let abc = people(&["A", "B", "C"]);
        let shares = equal_split(100, &abc).unwrap();
        assert_eq!(amounts(&shares, &abc), vec![34, 33, 33]);
    }

    #[test]
    fn test_equal_split_follows_input_order_not_id_order() {
        let cba = people(&["C", "B", "A"]);
        let shares = equal_split(101, &cba).unwrap();
        // C and B are listed first, so they take the two extra units
        assert_eq!(amounts(&shares, &cba), vec![34, 34, 33]);
    }

    #[test]
    fn test_equal_split_300_sek_three_ways() {
        let abc = people(&["A", "B", "C"]);
        let shares = equal_split(30000, &abc).unwrap();
        assert_eq!(amounts(&shares, &abc), vec![10000, 10000, 10000]);
    }

    #[test]
    fn test_equal_split_single_participant() {
        let a = people(&["A"]);
        assert_eq!(amounts(&equal_split(7, &a).unwrap(), &a), vec![7]);
    }

    #[test]
    fn test_equal_split_fewer_units_than_people() {
        let five = people(&["A", "B", "C", "D", "E"]);
        let shares = equal_split(2, &five).unwrap();
        assert_eq!(amounts(&shares, &five), vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_rejects_empty_and_duplicate_participants() {
        assert_eq!(equal_split(100, &[]), Err(ValidationError::NoParticipants));
        assert_eq!(
            equal_split(100, &people(&["A", "B", "A"])),
            Err(ValidationError::DuplicateParticipant("A".into()))
        );
    }

    #[test]
    fn test_rejects_non_positive_total() {
        let ab = people(&["A", "B"]);
        assert_eq!(equal_split(0, &ab), Err(ValidationError::NonPositiveAmount(0)));
        assert_eq!(equal_split(-5, &ab), Err(ValidationError::NonPositiveAmount(-5)));
    }

    // =========================================================================
    // Exact
    // =========================================================================

    #[test]
    fn test_exact_returns_supplied_shares() {
        let ab = people(&["A", "B"]);
        let policy = SplitPolicy::Exact(BTreeMap::from([("A".into(), 700), ("B".into(), 300)]));
        let shares = allocate(1000, &policy, &ab).unwrap();
        assert_eq!(amounts(&shares, &ab), vec![700, 300]);
    }

    #[test]
    fn test_exact_mismatch_is_rejected() {
        let ab = people(&["A", "B"]);
        let policy = SplitPolicy::Exact(BTreeMap::from([("A".into(), 700), ("B".into(), 200)]));
        assert_eq!(
            allocate(1000, &policy, &ab),
            Err(ValidationError::AllocationMismatch {
                expected: 1000,
                actual: 900
            })
        );
    }

    #[test]
    fn test_exact_requires_share_for_everyone() {
        let abc = people(&["A", "B", "C"]);
        let policy = SplitPolicy::Exact(BTreeMap::from([("A".into(), 700), ("B".into(), 300)]));
        assert_eq!(
            allocate(1000, &policy, &abc),
            Err(ValidationError::MissingShare("C".into()))
        );
    }

    #[test]
    fn test_exact_rejects_uninvolved_participant() {
        let ab = people(&["A", "B"]);
        let policy = SplitPolicy::Exact(BTreeMap::from([
            ("A".into(), 700),
            ("B".into(), 300),
            ("Z".into(), 0),
        ]));
        assert_eq!(
            allocate(1000, &policy, &ab),
            Err(ValidationError::UnknownParticipant("Z".into()))
        );
    }

    #[test]
    fn test_exact_rejects_negative_share() {
        let ab = people(&["A", "B"]);
        let policy = SplitPolicy::Exact(BTreeMap::from([("A".into(), 1100), ("B".into(), -100)]));
        assert!(matches!(
            allocate(1000, &policy, &ab),
            Err(ValidationError::NegativeShare { amount: -100, .. })
        ));
    }

    // =========================================================================
    // Percent
    // =========================================================================

    #[test]
    fn test_percent_uneven() {
        let abc = people(&["A", "B", "C"]);
        let policy = SplitPolicy::Percent(BTreeMap::from([
            ("A".into(), dec!(50)),
            ("B".into(), dec!(30)),
            ("C".into(), dec!(20)),
        ]));
        let shares = allocate(10000, &policy, &abc).unwrap();
        assert_eq!(amounts(&shares, &abc), vec![5000, 3000, 2000]);
    }

    #[test]
    fn test_percent_thirds_sum_exactly() {
        let abc = people(&["A", "B", "C"]);
        let policy = SplitPolicy::Percent(BTreeMap::from([
            ("A".into(), dec!(33.33)),
            ("B".into(), dec!(33.33)),
            ("C".into(), dec!(33.34)),
        ]));
        // exact: 33.33, 33.33, 33.34 -> floors 33, 33, 33, leftover 1 to C
        let shares = allocate(100, &policy, &abc).unwrap();
        assert_eq!(amounts(&shares, &abc), vec![33, 33, 34]);
    }

    #[test]
    fn test_percent_must_total_100() {
        let ab = people(&["A", "B"]);
        let policy = SplitPolicy::Percent(BTreeMap::from([
            ("A".into(), dec!(50)),
            ("B".into(), dec!(49.9)),
        ]));
        assert_eq!(
            allocate(1000, &policy, &ab),
            Err(ValidationError::PercentTotal(dec!(99.9)))
        );
    }

    #[test]
    fn test_percent_rejects_negative() {
        let ab = people(&["A", "B"]);
        let policy = SplitPolicy::Percent(BTreeMap::from([
            ("A".into(), dec!(110)),
            ("B".into(), dec!(-10)),
        ]));
        assert_eq!(
            allocate(1000, &policy, &ab),
            Err(ValidationError::NegativePercent("B".into()))
        );
    }

    // =========================================================================
    // Weights
    // =========================================================================

    #[test]
    fn test_weights_ties_go_to_first_listed() {
        let abc = people(&["A", "B", "C"]);
        let policy = SplitPolicy::Weights(BTreeMap::from([
            ("A".into(), dec!(1)),
            ("B".into(), dec!(1)),
            ("C".into(), dec!(1)),
        ]));
        let shares = allocate(100, &policy, &abc).unwrap();
        assert_eq!(amounts(&shares, &abc), vec![34, 33, 33]);
    }

    #[test]
    fn test_weights_largest_fraction_wins() {
        let ab = people(&["A", "B"]);
        // 10 * 1/4 = 2.5, 10 * 3/4 = 7.5 -> tie on .5, A first
        let policy =
            SplitPolicy::Weights(BTreeMap::from([("A".into(), dec!(1)), ("B".into(), dec!(3))]));
        assert_eq!(amounts(&allocate(10, &policy, &ab).unwrap(), &ab), vec![3, 7]);

        // 11 * 1/3 = 3.67, 11 * 2/3 = 7.33 -> A has the larger fraction
        let policy =
            SplitPolicy::Weights(BTreeMap::from([("A".into(), dec!(1)), ("B".into(), dec!(2))]));
        assert_eq!(amounts(&allocate(11, &policy, &ab).unwrap(), &ab), vec![4, 7]);
    }

    #[test]
    fn test_weights_zero_weight_gets_nothing() {
        let abc = people(&["A", "B", "C"]);
        let policy = SplitPolicy::Weights(BTreeMap::from([
            ("A".into(), dec!(2)),
            ("B".into(), dec!(0)),
            ("C".into(), dec!(1)),
        ]));
        let shares = allocate(900, &policy, &abc).unwrap();
        assert_eq!(amounts(&shares, &abc), vec![600, 0, 300]);
    }

    #[test]
    fn test_weights_validation() {
        let ab = people(&["A", "B"]);
        let zero =
            SplitPolicy::Weights(BTreeMap::from([("A".into(), dec!(0)), ("B".into(), dec!(0))]));
        assert_eq!(allocate(100, &zero, &ab), Err(ValidationError::ZeroWeightTotal));

        let negative =
            SplitPolicy::Weights(BTreeMap::from([("A".into(), dec!(-1)), ("B".into(), dec!(2))]));
        assert_eq!(
            allocate(100, &negative, &ab),
            Err(ValidationError::NegativeWeight("A".into()))
        );
    }

    // =========================================================================
    // Overflow
    // =========================================================================

    #[test]
    fn test_exact_shares_overflowing_i64_are_rejected() {
        let ab = people(&["A", "B"]);
        let policy =
            SplitPolicy::Exact(BTreeMap::from([("A".into(), i64::MAX), ("B".into(), 5)]));
        assert_eq!(allocate(i64::MAX, &policy, &ab), Err(ValidationError::SplitOverflow));
    }

    #[test]
    fn test_huge_weights_are_rejected() {
        let ab = people(&["A", "B"]);
        let policy = SplitPolicy::Weights(BTreeMap::from([
            ("A".into(), Decimal::MAX),
            ("B".into(), Decimal::MAX),
        ]));
        assert_eq!(allocate(100, &policy, &ab), Err(ValidationError::SplitOverflow));
    }

    #[test]
    fn test_huge_percents_are_rejected() {
        let ab = people(&["A", "B"]);
        let policy = SplitPolicy::Percent(BTreeMap::from([
            ("A".into(), Decimal::MAX),
            ("B".into(), Decimal::MAX),
        ]));
        assert_eq!(allocate(100, &policy, &ab), Err(ValidationError::SplitOverflow));
    }
}
