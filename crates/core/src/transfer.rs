//! TransferId - unique key of a screened transfer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::hash::{keccak256, Hash32};

/// Unique identifier of a cross-chain transfer (typically its source tx hash)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(Hash32);

impl TransferId {
    /// Wrap an existing hash
    pub const fn new(hash: Hash32) -> Self {
        Self(hash)
    }

    /// Derive an id from a human-readable label: keccak256(utf8(label))
    pub fn from_label(label: &str) -> Self {
        Self(keccak256(label.as_bytes()))
    }

    /// Underlying hash
    pub fn hash(&self) -> Hash32 {
        self.0
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransferId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<Hash32> for TransferId {
    fn from(hash: Hash32) -> Self {
        Self(hash)
    }
}
