//! Split policies.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::ParticipantId;

/// How an expense total is divided.
///
/// Serialized as `{"policy": "...", "params": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", content = "params", rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Everyone pays the same; leftover units go to the first participants.
    Equal,
    /// Caller supplies every share in minor units.
    Exact(BTreeMap<ParticipantId, i64>),
    /// Percent per participant; must sum to exactly 100.
    Percent(BTreeMap<ParticipantId, Decimal>),
    /// Non-negative weights with a positive sum.
    Weights(BTreeMap<ParticipantId, Decimal>),
}

/// Policy tag stored on an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Equal split.
    Equal,
    /// Exact amounts.
    Exact,
    /// Percentages.
    Percent,
    /// Weights.
    Weights,
}

impl SplitPolicy {
    /// Returns the tag of this policy.
    #[must_use]
    pub const fn mode(&self) -> SplitMode {
        match self {
            Self::Equal => SplitMode::Equal,
            Self::Exact(_) => SplitMode::Exact,
            Self::Percent(_) => SplitMode::Percent,
            Self::Weights(_) => SplitMode::Weights,
        }
    }
}

impl std::fmt::Display for SplitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Exact => write!(f, "exact"),
            Self::Percent => write!(f, "percent"),
            Self::Weights => write!(f, "weights"),
        }
    }
}
