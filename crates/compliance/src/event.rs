//! Engine events
//!
//! Emitted by successful engine operations. The durable journal stores them,
//! and replaying them rebuilds the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ThresholdPolicy;
use crate::decision::DecisionRecord;

/// Events emitted by the Compliance Decision Engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Threshold policy replaced by the administrator
    PolicyUpdated {
        policy: ThresholdPolicy,
        timestamp: DateTime<Utc>,
    },

    /// A transfer was classified and recorded
    DecisionRecorded { record: DecisionRecord },
}

impl EngineEvent {
    /// Get the timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            EngineEvent::PolicyUpdated { timestamp, .. } => *timestamp,
            EngineEvent::DecisionRecorded { record } => record.recorded_at,
        }
    }
}
