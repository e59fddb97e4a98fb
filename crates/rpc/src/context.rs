//! Application context - wires everything together
//!
//! The journal is replayed on open to rebuild the registry and the engine.
//! Every mutating call then follows the same flow:
//!
//! `plan (validate, no mutation) → append to journal → apply in memory`
//!
//! so a rejected call leaves both the journal and memory untouched, and a
//! failed journal write never reaches memory. `&mut self` serializes all
//! mutations within a process; the journal's exclusive file lock serializes
//! processes sharing a data directory.

use bridgewatch_compliance::{
    ComplianceDecisionEngine, ComplianceError, DecisionRecord, DecisionTier, EngineEvent,
    ScreeningRequest, ThresholdPolicy,
};
use bridgewatch_core::{Address, Emitted, Hash32, TransferId};
use bridgewatch_journal::{
    verify_journal, Journal, JournalEntry, JournalError, JournalEvent, JournalReader,
    SystemSigner,
};
use bridgewatch_sanctions::{RegistryError, SanctionsRegistry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::AppConfig;

/// Env var holding the system key seed (hex); overrides `key_file`
pub const SYSTEM_KEY_ENV: &str = "BRIDGEWATCH_SYSTEM_KEY";

/// Errors from the application context
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("System not initialized (run `init` first)")]
    NotInitialized,

    #[error("System already initialized")]
    AlreadyInitialized,

    #[error("Data directory is in use by another process ({} is locked)", .0.display())]
    Locked(PathBuf),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Compliance(#[from] ComplianceError),

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    #[error("Replay failed at seq {sequence}: {reason}")]
    Replay { sequence: u64, reason: String },
}

/// Result type for context operations
pub type ContextResult<T> = Result<T, ContextError>;

/// Snapshot of the public query surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub admin: Address,
    pub root: Hash32,
    pub last_updated: Option<DateTime<Utc>>,
    pub flag_threshold: u8,
    pub block_threshold: u8,
    pub total_decisions: u64,
    pub journal_sequence: u64,
}

/// Registry and engine, present once the system is initialized
struct System {
    registry: SanctionsRegistry,
    engine: ComplianceDecisionEngine,
}

impl System {
    fn new(admin: Address, policy: ThresholdPolicy) -> Self {
        Self {
            registry: SanctionsRegistry::new(admin),
            engine: ComplianceDecisionEngine::new(admin, policy),
        }
    }
}

/// Application context - wires together registry, engine and journal
pub struct AppContext {
    system: Option<System>,
    journal: Journal,
    journal_path: PathBuf,
}

impl AppContext {
    /// Open the context in `data_path`, replaying the journal
    ///
    /// The journal stays locked until the context is dropped; a second
    /// context on the same data directory fails with `Locked`.
    pub fn open(data_path: impl AsRef<Path>, config: &AppConfig) -> ContextResult<Self> {
        let data_path = data_path.as_ref();
        let journal_path = data_path.join(&config.journal_file);

        let signer = load_signer(data_path, config, true)?;
        let journal = Journal::open(&journal_path, signer).map_err(|e| match e {
            JournalError::Locked(path) => ContextError::Locked(path),
            other => other.into(),
        })?;

        // Chain and signatures were verified by `Journal::open` under the lock
        let entries = JournalReader::from_path(&journal_path).read_all()?;
        let system = replay(&entries)?;

        info!(
            entries = entries.len(),
            path = %journal_path.display(),
            "Journal replayed"
        );

        Ok(Self {
            system,
            journal,
            journal_path,
        })
    }

    /// Establish the administrator and the initial policy
    pub fn initialize(
        &mut self,
        admin: Address,
        policy: ThresholdPolicy,
    ) -> ContextResult<JournalEntry> {
        if self.system.is_some() {
            return Err(ContextError::AlreadyInitialized);
        }

        let entry = self
            .journal
            .append(JournalEvent::SystemInitialized { admin, policy })?;
        self.system = Some(System::new(admin, policy));

        info!(admin = %admin, "System initialized");
        Ok(entry)
    }

    /// Replace the sanctions commitment root (admin only)
    pub fn update_commitment(
        &mut self,
        caller: &Address,
        new_root: Hash32,
    ) -> ContextResult<Emitted<(), JournalEntry>> {
        let system = self.system.as_mut().ok_or(ContextError::NotInitialized)?;

        let event = system
            .registry
            .plan_commitment_update(caller, new_root, Utc::now())?;
        let entry = self.journal.append(event.clone().into())?;
        system.registry.apply(&event);

        info!(root = %new_root, sequence = entry.sequence, "Sanctions commitment updated");
        Ok(Emitted::new((), vec![entry]))
    }

    /// Replace the threshold policy (admin only)
    pub fn update_thresholds(
        &mut self,
        caller: &Address,
        flag: u8,
        block: u8,
    ) -> ContextResult<Emitted<(), JournalEntry>> {
        let system = self.system.as_mut().ok_or(ContextError::NotInitialized)?;

        let event = system.engine.plan_thresholds(caller, flag, block, Utc::now())?;
        let entry = self.journal.append(event.clone().into())?;
        system.engine.apply(&event)?;

        info!(flag, block, sequence = entry.sequence, "Threshold policy updated");
        Ok(Emitted::new((), vec![entry]))
    }

    /// Classify and record a transfer with a precomputed sanction verdict
    pub fn record_decision(
        &mut self,
        transfer_id: TransferId,
        sender: Address,
        recipient: Address,
        risk_score: u8,
        sanctioned: bool,
    ) -> ContextResult<Emitted<DecisionTier, JournalEntry>> {
        let system = self.system.as_mut().ok_or(ContextError::NotInitialized)?;

        let record = system.engine.plan_decision(
            transfer_id,
            sender,
            recipient,
            risk_score,
            sanctioned,
            Utc::now(),
        )?;
        let tier = record.tier;

        let event = EngineEvent::DecisionRecorded { record };
        let entry = self.journal.append(event.clone().into())?;
        system.engine.apply(&event)?;

        info!(
            transfer_id = %transfer_id,
            risk_score,
            sanctioned,
            tier = %tier,
            sequence = entry.sequence,
            "Decision recorded"
        );
        Ok(Emitted::new(tier, vec![entry]))
    }

    /// Check both parties against the registry, then record the decision
    pub fn screen(
        &mut self,
        request: ScreeningRequest,
    ) -> ContextResult<Emitted<DecisionTier, JournalEntry>> {
        let sanctioned = {
            let system = self.system.as_ref().ok_or(ContextError::NotInitialized)?;
            if system.engine.get_record(&request.transfer_id).is_ok() {
                return Err(ComplianceError::DuplicateRecord(request.transfer_id).into());
            }
            request.is_sanctioned(&system.registry)
        };

        if sanctioned {
            warn!(transfer_id = %request.transfer_id, "Transfer party matched sanctions list");
        }

        self.record_decision(
            request.transfer_id,
            request.sender,
            request.recipient,
            request.risk_score,
            sanctioned,
        )
    }

    /// Verify membership and journal the observation events
    pub fn check_and_report(
        &mut self,
        identity: &Address,
        proof: &[Hash32],
    ) -> ContextResult<Emitted<bool, JournalEntry>> {
        let system = self.system.as_ref().ok_or(ContextError::NotInitialized)?;

        let (verdict, events) = system.registry.check_and_report(identity, proof).into_parts();
        let entries = self
            .journal
            .append_all(events.into_iter().map(JournalEvent::from).collect())?;

        Ok(Emitted::new(verdict, entries))
    }

    /// Pure membership check against the current root
    pub fn verify_membership(&self, identity: &Address, proof: &[Hash32]) -> ContextResult<bool> {
        Ok(self.system()?.registry.verify_membership(identity, proof))
    }

    /// Look up a recorded decision
    pub fn get_record(&self, transfer_id: &TransferId) -> ContextResult<&DecisionRecord> {
        Ok(self.system()?.engine.get_record(transfer_id)?)
    }

    /// Number of recorded decisions
    pub fn total_decisions(&self) -> ContextResult<u64> {
        Ok(self.system()?.engine.total_decisions())
    }

    /// Snapshot of root, policy and counters
    pub fn status(&self) -> ContextResult<Status> {
        let system = self.system()?;
        Ok(Status {
            admin: *system.registry.admin(),
            root: system.registry.root(),
            last_updated: system.registry.last_updated(),
            flag_threshold: system.engine.flag_threshold(),
            block_threshold: system.engine.block_threshold(),
            total_decisions: system.engine.total_decisions(),
            journal_sequence: self.journal.last_sequence(),
        })
    }

    /// Re-read the journal from disk and verify its chain and signatures
    pub fn audit(&self) -> ContextResult<usize> {
        let entries = JournalReader::from_path(&self.journal_path).read_all()?;
        verify_journal(&entries, &self.journal.signer().verifying_key())?;
        Ok(entries.len())
    }

    /// Check if system is initialized
    pub fn is_initialized(&self) -> bool {
        self.system.is_some()
    }

    /// Get journal path
    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    /// Get last journal sequence number
    pub fn last_sequence(&self) -> u64 {
        self.journal.last_sequence()
    }

    fn system(&self) -> ContextResult<&System> {
        self.system.as_ref().ok_or(ContextError::NotInitialized)
    }
}

/// Verify the journal in `data_path` without opening a context
///
/// Needs no lock and never creates files, so it also works on a journal that
/// `AppContext::open` refuses.
pub fn audit_journal(data_path: impl AsRef<Path>, config: &AppConfig) -> ContextResult<usize> {
    let data_path = data_path.as_ref();
    let signer = load_signer(data_path, config, false)?;

    let entries = JournalReader::from_path(data_path.join(&config.journal_file)).read_all()?;
    verify_journal(&entries, &signer.verifying_key())?;
    Ok(entries.len())
}

fn load_signer(data_path: &Path, config: &AppConfig, create: bool) -> ContextResult<SystemSigner> {
    if let Ok(seed) = std::env::var(SYSTEM_KEY_ENV) {
        return Ok(SystemSigner::from_hex(&seed).map_err(JournalError::from)?);
    }

    let key_path = data_path.join(&config.key_file);
    let signer = if create {
        SystemSigner::load_or_generate(&key_path)?
    } else {
        SystemSigner::load(&key_path)?
    };
    Ok(signer)
}

/// Rebuild registry and engine from journal entries
fn replay(entries: &[JournalEntry]) -> ContextResult<Option<System>> {
    let mut system: Option<System> = None;

    for entry in entries {
        let replay_error = |reason: String| ContextError::Replay {
            sequence: entry.sequence,
            reason,
        };

        match &entry.event {
            JournalEvent::SystemInitialized { admin, policy } => {
                if system.is_some() {
                    return Err(replay_error("duplicate initialization".to_string()));
                }
                system = Some(System::new(*admin, *policy));
            }
            JournalEvent::Registry(event) => {
                let current = system
                    .as_mut()
                    .ok_or_else(|| replay_error("event before initialization".to_string()))?;
                current.registry.apply(event);
            }
            JournalEvent::Engine(event) => {
                let current = system
                    .as_mut()
                    .ok_or_else(|| replay_error("event before initialization".to_string()))?;
                current
                    .engine
                    .apply(event)
                    .map_err(|e| replay_error(e.to_string()))?;
            }
        }
    }

    Ok(system)
}
