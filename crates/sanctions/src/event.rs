//! Registry events
//!
//! Emitted by successful registry operations and consumed by indexers and
//! alerting. They are never needed for the registry's own correctness.

use bridgewatch_core::{Address, Hash32};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events emitted by the Sanctions Registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// Commitment root was replaced by the administrator
    CommitmentUpdated {
        root: Hash32,
        timestamp: DateTime<Utc>,
    },

    /// A membership check was reported
    MembershipChecked {
        identity: Address,
        verdict: bool,
        timestamp: DateTime<Utc>,
    },

    /// A reported check matched the sanctioned set
    SanctionedMatchDetected {
        identity: Address,
        timestamp: DateTime<Utc>,
    },
}

impl RegistryEvent {
    /// Get the timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            RegistryEvent::CommitmentUpdated { timestamp, .. } => *timestamp,
            RegistryEvent::MembershipChecked { timestamp, .. } => *timestamp,
            RegistryEvent::SanctionedMatchDetected { timestamp, .. } => *timestamp,
        }
    }

    /// Get the identity if applicable
    pub fn identity(&self) -> Option<&Address> {
        match self {
            RegistryEvent::CommitmentUpdated { .. } => None,
            RegistryEvent::MembershipChecked { identity, .. } => Some(identity),
            RegistryEvent::SanctionedMatchDetected { identity, .. } => Some(identity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_tag() {
        let event = RegistryEvent::SanctionedMatchDetected {
            identity: Address::new([0x09; 20]),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("sanctioned_match_detected"));
        assert!(json.contains("0x0909"));

        let parsed: RegistryEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_accessors() {
        let event = RegistryEvent::CommitmentUpdated {
            root: Hash32::ZERO,
            timestamp: Utc::now(),
        };
        assert!(event.identity().is_none());
        assert!(event.timestamp() <= Utc::now());
    }
}
