//! Threshold policy with validated cutoffs
//!
//! Invariant: `flag < block <= 100`. A `ThresholdPolicy` value that violates
//! it cannot be constructed or deserialized, so the policy held by the
//! engine is always valid.

use serde::{Deserialize, Serialize};

use crate::error::{ComplianceError, ComplianceResult};

/// Highest allowed block threshold
pub const MAX_THRESHOLD: u8 = 100;

/// Score cutoffs separating the decision tiers
///
/// Both thresholds are inclusive lower bounds of their tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPolicy")]
pub struct ThresholdPolicy {
    flag_threshold: u8,
    block_threshold: u8,
}

/// Unvalidated form used for deserialization (missing fields take defaults)
#[derive(Deserialize)]
struct RawPolicy {
    #[serde(default = "default_flag_threshold")]
    flag_threshold: u8,
    #[serde(default = "default_block_threshold")]
    block_threshold: u8,
}

fn default_flag_threshold() -> u8 {
    40
}

fn default_block_threshold() -> u8 {
    80
}

impl ThresholdPolicy {
    /// Create a policy, rejecting `flag >= block` and `block > 100`
    pub fn new(flag_threshold: u8, block_threshold: u8) -> ComplianceResult<Self> {
        if flag_threshold >= block_threshold {
            return Err(ComplianceError::InvalidThreshold {
                flag: flag_threshold,
                block: block_threshold,
                reason: "Flag must be less than block",
            });
        }

        if block_threshold > MAX_THRESHOLD {
            return Err(ComplianceError::InvalidThreshold {
                flag: flag_threshold,
                block: block_threshold,
                reason: "Block threshold max 100",
            });
        }

        Ok(Self {
            flag_threshold,
            block_threshold,
        })
    }

    pub fn flag_threshold(&self) -> u8 {
        self.flag_threshold
    }

    pub fn block_threshold(&self) -> u8 {
        self.block_threshold
    }

    /// Load a policy from a JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            flag_threshold: default_flag_threshold(),
            block_threshold: default_block_threshold(),
        }
    }
}

impl TryFrom<RawPolicy> for ThresholdPolicy {
    type Error = ComplianceError;

    fn try_from(raw: RawPolicy) -> Result<Self, Self::Error> {
        ThresholdPolicy::new(raw.flag_threshold, raw.block_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = ThresholdPolicy::default();
        assert_eq!(policy.flag_threshold(), 40);
        assert_eq!(policy.block_threshold(), 80);
        assert_eq!(ThresholdPolicy::new(40, 80).unwrap(), policy);
    }

    #[test]
    fn test_flag_must_be_below_block() {
        let err = ThresholdPolicy::new(80, 40).unwrap_err();
        assert_eq!(
            err,
            ComplianceError::InvalidThreshold {
                flag: 80,
                block: 40,
                reason: "Flag must be less than block",
            }
        );
        assert!(ThresholdPolicy::new(50, 50).is_err());
    }

    #[test]
    fn test_block_max_100() {
        let err = ThresholdPolicy::new(30, 150).unwrap_err();
        assert!(matches!(
            err,
            ComplianceError::InvalidThreshold { reason: "Block threshold max 100", .. }
        ));
        assert!(ThresholdPolicy::new(99, 100).is_ok());
        assert!(ThresholdPolicy::new(0, 1).is_ok());
    }

    #[test]
    fn test_policy_serialization() {
        let policy = ThresholdPolicy::new(25, 75).unwrap();
        let json = serde_json::to_string(&policy).unwrap();

        assert!(json.contains("flag_threshold"));
        let parsed: ThresholdPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, policy);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let policy: ThresholdPolicy = serde_json::from_str(r#"{ "flag_threshold": 10 }"#).unwrap();
        assert_eq!(policy.flag_threshold(), 10);
        assert_eq!(policy.block_threshold(), 80);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let result: Result<ThresholdPolicy, _> =
            serde_json::from_str(r#"{ "flag_threshold": 90, "block_threshold": 20 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(&path, r#"{ "flag_threshold": 30, "block_threshold": 90 }"#).unwrap();

        let policy = ThresholdPolicy::from_file(&path).unwrap();
        assert_eq!(policy, ThresholdPolicy::new(30, 90).unwrap());
    }
}
