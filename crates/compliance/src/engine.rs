//! Compliance Decision Engine - Main orchestrator
//!
//! Owns the threshold policy and the decision ledger. Every operation either
//! commits fully and returns its events, or fails before touching state.

use bridgewatch_core::{Address, Emitted, Hash32, TransferId};
use bridgewatch_sanctions::MembershipOracle;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::ThresholdPolicy;
use crate::decision::{classify, DecisionRecord, DecisionTier};
use crate::error::{ComplianceError, ComplianceResult};
use crate::event::EngineEvent;
use crate::ledger::DecisionLedger;

/// A transfer to screen against a sanctions oracle
#[derive(Debug, Clone)]
pub struct ScreeningRequest {
    pub transfer_id: TransferId,
    pub sender: Address,
    pub recipient: Address,
    pub risk_score: u8,
    /// Inclusion proof for the sender (empty = single-entity check)
    pub sender_proof: Vec<Hash32>,
    /// Inclusion proof for the recipient (empty = single-entity check)
    pub recipient_proof: Vec<Hash32>,
}

impl ScreeningRequest {
    /// Sanction verdict for the transfer: true if either party is in the set
    pub fn is_sanctioned(&self, oracle: &impl MembershipOracle) -> bool {
        oracle.is_sanctioned(&self.sender, &self.sender_proof)
            || oracle.is_sanctioned(&self.recipient, &self.recipient_proof)
    }
}

/// Main Compliance Decision Engine
///
/// Orchestrates:
/// - Threshold policy updates (admin only)
/// - Classification of transfers
/// - Decision Ledger writes (once per transfer id)
#[derive(Debug, Clone)]
pub struct ComplianceDecisionEngine {
    admin: Address,
    policy: ThresholdPolicy,
    ledger: DecisionLedger,
}

impl ComplianceDecisionEngine {
    /// Create a new engine
    pub fn new(admin: Address, policy: ThresholdPolicy) -> Self {
        Self {
            admin,
            policy,
            ledger: DecisionLedger::new(),
        }
    }

    /// Replace the threshold policy (admin only)
    pub fn update_thresholds(
        &mut self,
        caller: &Address,
        flag: u8,
        block: u8,
    ) -> ComplianceResult<Emitted<(), EngineEvent>> {
        let event = self.plan_thresholds(caller, flag, block, Utc::now())?;
        self.apply(&event)?;

        info!(flag, block, "Threshold policy updated");

        Ok(Emitted::new((), vec![event]))
    }

    /// Validate a threshold update and build its event without applying it
    pub fn plan_thresholds(
        &self,
        caller: &Address,
        flag: u8,
        block: u8,
        now: DateTime<Utc>,
    ) -> ComplianceResult<EngineEvent> {
        self.ensure_admin(caller)?;
        let policy = ThresholdPolicy::new(flag, block)?;

        Ok(EngineEvent::PolicyUpdated {
            policy,
            timestamp: now,
        })
    }

    /// Classify and record a transfer
    pub fn record_decision(
        &mut self,
        transfer_id: TransferId,
        sender: Address,
        recipient: Address,
        risk_score: u8,
        sanctioned: bool,
    ) -> ComplianceResult<Emitted<DecisionTier, EngineEvent>> {
        let record = self.plan_decision(
            transfer_id,
            sender,
            recipient,
            risk_score,
            sanctioned,
            Utc::now(),
        )?;
        let tier = record.tier;
        let event = EngineEvent::DecisionRecorded { record };
        self.apply(&event)?;

        info!(
            transfer_id = %transfer_id,
            sender = %sender,
            recipient = %recipient,
            risk_score,
            sanctioned,
            tier = %tier,
            "Decision recorded"
        );

        Ok(Emitted::new(tier, vec![event]))
    }

    /// Classify a transfer and build its record without storing it
    ///
    /// Fails with `DuplicateRecord` if `transfer_id` was already recorded.
    pub fn plan_decision(
        &self,
        transfer_id: TransferId,
        sender: Address,
        recipient: Address,
        risk_score: u8,
        sanctioned: bool,
        now: DateTime<Utc>,
    ) -> ComplianceResult<DecisionRecord> {
        if self.ledger.contains(&transfer_id) {
            warn!(transfer_id = %transfer_id, "Duplicate decision refused");
            return Err(ComplianceError::DuplicateRecord(transfer_id));
        }

        Ok(DecisionRecord {
            transfer_id,
            sender,
            recipient,
            risk_score,
            sanctioned,
            tier: classify(&self.policy, risk_score, sanctioned),
            recorded_at: now,
        })
    }

    /// Apply a previously planned or journaled event
    ///
    /// A `DecisionRecorded` event for an id that is already present fails
    /// with `DuplicateRecord` and changes nothing.
    pub fn apply(&mut self, event: &EngineEvent) -> ComplianceResult<()> {
        match event {
            EngineEvent::PolicyUpdated { policy, .. } => {
                self.policy = *policy;
                Ok(())
            }
            EngineEvent::DecisionRecorded { record } => self.ledger.insert(record.clone()),
        }
    }

    /// Check both parties against `oracle`, then record the decision.
    ///
    /// The transfer counts as sanctioned if either party is in the set.
    pub fn screen(
        &mut self,
        oracle: &impl MembershipOracle,
        request: ScreeningRequest,
    ) -> ComplianceResult<Emitted<DecisionTier, EngineEvent>> {
        if self.ledger.contains(&request.transfer_id) {
            return Err(ComplianceError::DuplicateRecord(request.transfer_id));
        }

        let sanctioned = request.is_sanctioned(oracle);

        self.record_decision(
            request.transfer_id,
            request.sender,
            request.recipient,
            request.risk_score,
            sanctioned,
        )
    }

    /// Look up a recorded decision
    pub fn get_record(&self, transfer_id: &TransferId) -> ComplianceResult<&DecisionRecord> {
        self.ledger
            .get(transfer_id)
            .ok_or(ComplianceError::NotFound(*transfer_id))
    }

    /// Number of successfully recorded decisions
    pub fn total_decisions(&self) -> u64 {
        self.ledger.total()
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    pub fn flag_threshold(&self) -> u8 {
        self.policy.flag_threshold()
    }

    pub fn block_threshold(&self) -> u8 {
        self.policy.block_threshold()
    }

    pub fn admin(&self) -> &Address {
        &self.admin
    }

    /// All records in the order they were recorded
    pub fn records(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.ledger.iter()
    }

    fn ensure_admin(&self, caller: &Address) -> ComplianceResult<()> {
        if *caller != self.admin {
            warn!(caller = %caller, "Rejected threshold update from non-admin");
            return Err(ComplianceError::Unauthorized { caller: *caller });
        }
        Ok(())
    }
}
