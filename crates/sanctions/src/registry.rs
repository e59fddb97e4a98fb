//! Sanctions Registry - commitment state and membership verification

use bridgewatch_core::{Address, Emitted, Hash32};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::event::RegistryEvent;
use crate::merkle::{compute_leaf, parse_proof, process_proof};

/// Anything that can answer "is this identity in the sanctioned set?"
///
/// The decision engine depends on this seam rather than on the registry
/// itself, so a precomputed verdict source can be plugged in instead.
pub trait MembershipOracle {
    fn is_sanctioned(&self, identity: &Address, proof: &[Hash32]) -> bool;
}

/// Holds the commitment to the sanctioned set and nothing else.
///
/// State:
/// - `root`: current commitment (`Hash32::ZERO` = nothing committed)
/// - `last_updated`: time of the last commitment change
/// - `admin`: the only principal allowed to replace the root
#[derive(Debug, Clone)]
pub struct SanctionsRegistry {
    admin: Address,
    root: Hash32,
    last_updated: Option<DateTime<Utc>>,
}

impl SanctionsRegistry {
    /// Create an empty registry administered by `admin`
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            root: Hash32::ZERO,
            last_updated: None,
        }
    }

    /// Replace the commitment root (admin only)
    pub fn update_commitment(
        &mut self,
        caller: &Address,
        new_root: Hash32,
    ) -> RegistryResult<Emitted<(), RegistryEvent>> {
        self.update_commitment_at(caller, new_root, Utc::now())
    }

    /// Replace the commitment root with an explicit clock reading
    pub fn update_commitment_at(
        &mut self,
        caller: &Address,
        new_root: Hash32,
        now: DateTime<Utc>,
    ) -> RegistryResult<Emitted<(), RegistryEvent>> {
        let event = self.plan_commitment_update(caller, new_root, now)?;
        self.apply(&event);

        info!(root = %new_root, timestamp = %event.timestamp(), "Sanctions commitment updated");

        Ok(Emitted::new((), vec![event]))
    }

    /// Validate a commitment update and build its event without applying it
    pub fn plan_commitment_update(
        &self,
        caller: &Address,
        new_root: Hash32,
        now: DateTime<Utc>,
    ) -> RegistryResult<RegistryEvent> {
        self.ensure_admin(caller)?;

        Ok(RegistryEvent::CommitmentUpdated {
            root: new_root,
            timestamp: self.next_timestamp(now),
        })
    }

    /// Apply a previously planned or journaled event.
    ///
    /// Only `CommitmentUpdated` changes state; observation events are ignored.
    pub fn apply(&mut self, event: &RegistryEvent) {
        if let RegistryEvent::CommitmentUpdated { root, timestamp } = event {
            self.root = *root;
            self.last_updated = Some(self.next_timestamp(*timestamp));
        }
    }

    /// Leaf hash for an identity, as used by proof construction tooling
    pub fn compute_leaf(identity: &Address) -> Hash32 {
        compute_leaf(identity)
    }

    /// Verify that `identity` is in the set committed by the current root
    pub fn verify_membership(&self, identity: &Address, proof: &[Hash32]) -> bool {
        let computed = process_proof(compute_leaf(identity), proof);
        let verdict = computed == self.root;

        debug!(
            identity = %identity,
            proof_len = proof.len(),
            verdict,
            "Membership verified"
        );

        verdict
    }

    /// Verify membership from hex-encoded inputs
    ///
    /// Fails with `MalformedInput` if the identity is not 20 bytes or any
    /// proof element is not 32 bytes.
    pub fn verify_membership_hex<S: AsRef<str>>(
        &self,
        identity: &str,
        proof: &[S],
    ) -> RegistryResult<bool> {
        let identity: Address = identity.parse()?;
        let proof = parse_proof(proof)?;
        Ok(self.verify_membership(&identity, &proof))
    }

    /// Verify membership and report the result as audit events
    ///
    /// Always emits `MembershipChecked`; additionally emits
    /// `SanctionedMatchDetected` when the identity is in the set.
    pub fn check_and_report(
        &self,
        identity: &Address,
        proof: &[Hash32],
    ) -> Emitted<bool, RegistryEvent> {
        let verdict = self.verify_membership(identity, proof);
        let timestamp = Utc::now();

        let mut events = vec![RegistryEvent::MembershipChecked {
            identity: *identity,
            verdict,
            timestamp,
        }];

        if verdict {
            warn!(identity = %identity, "Sanctioned identity matched");
            events.push(RegistryEvent::SanctionedMatchDetected {
                identity: *identity,
                timestamp,
            });
        }

        Emitted::new(verdict, events)
    }

    /// Current commitment root
    pub fn root(&self) -> Hash32 {
        self.root
    }

    /// Time of the last commitment change (`None` if never updated)
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// The administrative principal
    pub fn admin(&self) -> &Address {
        &self.admin
    }

    fn ensure_admin(&self, caller: &Address) -> RegistryResult<()> {
        if *caller != self.admin {
            warn!(caller = %caller, "Rejected commitment update from non-admin");
            return Err(RegistryError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    /// Clock readings never move `last_updated` backwards
    fn next_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.last_updated {
            Some(prev) if prev > now => prev,
            _ => now,
        }
    }
}

impl MembershipOracle for SanctionsRegistry {
    fn is_sanctioned(&self, identity: &Address, proof: &[Hash32]) -> bool {
        self.verify_membership(identity, proof)
    }
}
