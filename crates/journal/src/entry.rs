//! Journal entries and the events they carry

use bridgewatch_compliance::{EngineEvent, ThresholdPolicy};
use bridgewatch_core::Address;
use bridgewatch_sanctions::RegistryEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::signature::EntrySignature;

/// `prev_hash` of the first entry
pub const GENESIS_PREV_HASH: &str = "GENESIS";

/// Everything the journal records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "event", rename_all = "snake_case")]
pub enum JournalEvent {
    /// First entry: establishes the administrator and the initial policy
    SystemInitialized {
        admin: Address,
        policy: ThresholdPolicy,
    },
    Registry(RegistryEvent),
    Engine(EngineEvent),
}

impl From<RegistryEvent> for JournalEvent {
    fn from(event: RegistryEvent) -> Self {
        JournalEvent::Registry(event)
    }
}

impl From<EngineEvent> for JournalEvent {
    fn from(event: EngineEvent) -> Self {
        JournalEvent::Engine(event)
    }
}

/// One line of the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// 1-based, strictly increasing
    pub sequence: u64,
    /// Hash of the previous entry, or `GENESIS`
    pub prev_hash: String,
    /// SHA-256 over sequence, prev_hash, timestamp and event
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    pub event: JournalEvent,
    /// System signature over sequence, prev_hash and hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<EntrySignature>,
}
