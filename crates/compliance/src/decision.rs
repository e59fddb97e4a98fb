//! Decision tiers and the classification rule
//!
//! Tiers follow a total order for escalation:
//! `Approved < Flagged < Blocked`

use bridgewatch_core::{Address, TransferId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum_macros::{Display, EnumString};

use crate::config::ThresholdPolicy;

/// Outcome of classifying a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DecisionTier {
    /// Transfer proceeds
    Approved = 0,
    /// Transfer held for manual review
    Flagged = 1,
    /// Transfer rejected
    Blocked = 2,
}

impl DecisionTier {
    /// Numeric code (0 = approved, 1 = flagged, 2 = blocked)
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl PartialOrd for DecisionTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DecisionTier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(&other.code())
    }
}

/// Classify a transfer.
///
/// Precedence:
/// 1. a sanction match always blocks, whatever the score
/// 2. `score >= block` blocks
/// 3. `score >= flag` flags
/// 4. otherwise approved
pub fn classify(policy: &ThresholdPolicy, risk_score: u8, sanctioned: bool) -> DecisionTier {
    if sanctioned {
        DecisionTier::Blocked
    } else if risk_score >= policy.block_threshold() {
        DecisionTier::Blocked
    } else if risk_score >= policy.flag_threshold() {
        DecisionTier::Flagged
    } else {
        DecisionTier::Approved
    }
}

/// Immutable audit entry for one classified transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub transfer_id: TransferId,
    pub sender: Address,
    pub recipient: Address,
    /// Score as submitted by the external scorer
    pub risk_score: u8,
    /// Sanction verdict as submitted
    pub sanctioned: bool,
    pub tier: DecisionTier,
    pub recorded_at: DateTime<Utc>,
}
