//! Journal errors

use std::path::PathBuf;
use thiserror::Error;

use crate::hash::ChainError;
use crate::signature::SignatureError;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Journal integrity violation: {0}")]
    Chain(#[from] ChainError),

    #[error("Journal signature violation: {0}")]
    Signature(#[from] SignatureError),

    #[error("Journal {} is locked by another process", .0.display())]
    Locked(PathBuf),
}

/// Result type for journal operations
pub type JournalResult<T> = Result<T, JournalError>;
