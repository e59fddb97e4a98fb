//! Hash chain utilities for journal integrity

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::entry::{JournalEntry, GENESIS_PREV_HASH};

/// Calculate SHA256 hash of entry content (excluding the hash field itself)
pub fn calculate_entry_hash(entry: &JournalEntry) -> Result<String, serde_json::Error> {
    let mut hasher = Sha256::new();

    hasher.update(entry.sequence.to_le_bytes());
    hasher.update(entry.prev_hash.as_bytes());
    hasher.update(entry.timestamp.to_rfc3339().as_bytes());
    hasher.update(serde_json::to_vec(&entry.event)?);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify hash chain integrity
pub fn verify_chain(entries: &[JournalEntry]) -> Result<(), ChainError> {
    let mut prev_hash = GENESIS_PREV_HASH.to_string();
    let mut expected_sequence = 1;

    for entry in entries {
        if entry.sequence != expected_sequence {
            return Err(ChainError::InvalidSequence {
                expected: expected_sequence,
                actual: entry.sequence,
            });
        }

        if entry.prev_hash != prev_hash {
            return Err(ChainError::BrokenLink {
                sequence: entry.sequence,
                expected: prev_hash,
                actual: entry.prev_hash.clone(),
            });
        }

        let calculated = calculate_entry_hash(entry).map_err(|e| ChainError::Unhashable {
            sequence: entry.sequence,
            reason: e.to_string(),
        })?;
        if entry.hash != calculated {
            return Err(ChainError::InvalidHash {
                sequence: entry.sequence,
                expected: calculated,
                actual: entry.hash.clone(),
            });
        }

        prev_hash = entry.hash.clone();
        expected_sequence += 1;
    }

    Ok(())
}

/// Errors in hash chain verification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Broken link at seq {sequence}: expected prev_hash '{expected}', got '{actual}'")]
    BrokenLink {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid hash at seq {sequence}: expected '{expected}', got '{actual}'")]
    InvalidHash {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid sequence: expected {expected}, got {actual}")]
    InvalidSequence { expected: u64, actual: u64 },

    #[error("Entry at seq {sequence} cannot be hashed: {reason}")]
    Unhashable { sequence: u64, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::JournalEvent;
    use bridgewatch_compliance::ThresholdPolicy;
    use bridgewatch_core::{keccak256, Address};
    use bridgewatch_sanctions::RegistryEvent;
    use chrono::Utc;

    fn create_entry(sequence: u64, prev_hash: &str, event: JournalEvent) -> JournalEntry {
        let mut entry = JournalEntry {
            sequence,
            prev_hash: prev_hash.to_string(),
            hash: String::new(),
            timestamp: Utc::now(),
            event,
            signature: None,
        };
        entry.hash = calculate_entry_hash(&entry).unwrap();
        entry
    }

    fn genesis() -> JournalEntry {
        create_entry(
            1,
            GENESIS_PREV_HASH,
            JournalEvent::SystemInitialized {
                admin: Address::new([0xad; 20]),
                policy: ThresholdPolicy::default(),
            },
        )
    }

    fn root_update(sequence: u64, prev: &str) -> JournalEntry {
        create_entry(
            sequence,
            prev,
            JournalEvent::Registry(RegistryEvent::CommitmentUpdated {
                root: keccak256(sequence.to_le_bytes()),
                timestamp: Utc::now(),
            }),
        )
    }

    #[test]
    fn test_hash_deterministic() {
        let entry = genesis();
        assert_eq!(
            calculate_entry_hash(&entry).unwrap(),
            calculate_entry_hash(&entry).unwrap()
        );
    }

    #[test]
    fn test_verify_valid_chain() {
        let e1 = genesis();
        let e2 = root_update(2, &e1.hash);
        let e3 = root_update(3, &e2.hash);

        assert!(verify_chain(&[e1, e2, e3]).is_ok());
        assert!(verify_chain(&[]).is_ok());
    }

    #[test]
    fn test_verify_broken_chain() {
        let e1 = genesis();
        let e2 = root_update(2, "wrong_hash");

        let result = verify_chain(&[e1, e2]);
        assert!(matches!(result, Err(ChainError::BrokenLink { sequence: 2, .. })));
    }

    #[test]
    fn test_tampered_event_detected() {
        let e1 = genesis();
        let mut e2 = root_update(2, &e1.hash);
        e2.event = JournalEvent::Registry(RegistryEvent::CommitmentUpdated {
            root: keccak256(b"forged"),
            timestamp: e2.timestamp,
        });

        let result = verify_chain(&[e1, e2]);
        assert!(matches!(result, Err(ChainError::InvalidHash { sequence: 2, .. })));
    }

    #[test]
    fn test_deleted_entry_detected() {
        let e1 = genesis();
        let e2 = root_update(2, &e1.hash);
        let e3 = root_update(3, &e2.hash);

        let result = verify_chain(&[e1, e3]);
        assert!(matches!(
            result,
            Err(ChainError::InvalidSequence { expected: 2, actual: 3 })
        ));
    }
}
