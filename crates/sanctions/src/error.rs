//! Registry errors

use bridgewatch_core::{Address, CoreError};
use thiserror::Error;

/// Errors from the Sanctions Registry
///
/// A non-matching proof is not an error: verification returns `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Unauthorized: {caller} is not the registry administrator")]
    Unauthorized { caller: Address },

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl From<CoreError> for RegistryError {
    fn from(e: CoreError) -> Self {
        RegistryError::MalformedInput(e.to_string())
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
