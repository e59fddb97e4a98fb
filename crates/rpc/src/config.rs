//! Application configuration
//!
//! Everything has a default, so an empty (or absent) config file is valid.

use bridgewatch_compliance::ThresholdPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the BridgeWatch application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Journal file name inside the data directory
    #[serde(default = "default_journal_file")]
    pub journal_file: String,

    /// System signing key, relative to the data directory unless absolute
    #[serde(default = "default_key_file")]
    pub key_file: String,

    /// Policy installed by `init` when no thresholds are given
    #[serde(default)]
    pub initial_policy: ThresholdPolicy,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_journal_file() -> String {
    "journal.jsonl".to_string()
}

fn default_key_file() -> String {
    "system.key".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            journal_file: default_journal_file(),
            key_file: default_key_file(),
            initial_policy: ThresholdPolicy::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
