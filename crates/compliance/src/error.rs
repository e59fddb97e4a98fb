//! Compliance errors

use bridgewatch_core::{Address, CoreError, TransferId};
use thiserror::Error;

/// Errors from the Compliance Decision Engine
///
/// Every variant is raised before any state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComplianceError {
    #[error("Unauthorized: {caller} is not the engine administrator")]
    Unauthorized { caller: Address },

    #[error("Invalid threshold (flag={flag}, block={block}): {reason}")]
    InvalidThreshold {
        flag: u8,
        block: u8,
        reason: &'static str,
    },

    #[error("Decision already recorded for transfer {0}")]
    DuplicateRecord(TransferId),

    #[error("No decision recorded for transfer {0}")]
    NotFound(TransferId),

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl From<CoreError> for ComplianceError {
    fn from(e: CoreError) -> Self {
        ComplianceError::MalformedInput(e.to_string())
    }
}

impl From<bridgewatch_sanctions::RegistryError> for ComplianceError {
    fn from(e: bridgewatch_sanctions::RegistryError) -> Self {
        match e {
            bridgewatch_sanctions::RegistryError::Unauthorized { caller } => {
                ComplianceError::Unauthorized { caller }
            }
            bridgewatch_sanctions::RegistryError::MalformedInput(msg) => {
                ComplianceError::MalformedInput(msg)
            }
        }
    }
}

/// Result type for compliance operations
pub type ComplianceResult<T> = Result<T, ComplianceError>;
