//! Address - 20-byte identity
//!
//! Used for transfer parties, sanctioned entities and the administrative
//! principal alike.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{decode_fixed, CoreError};

/// A 20-byte account identity.
///
/// Input hex is case-insensitive; display is lowercase with a `0x` prefix.
///
/// # Example
/// ```
/// use bridgewatch_core::Address;
///
/// let a: Address = "0x098B716B8Aaf21512996dC57EB0615e2383E2f96".parse().unwrap();
/// let b: Address = "0x098b716b8aaf21512996dc57eb0615e2383e2f96".parse().unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// Width of an address in bytes
    pub const LEN: usize = 20;

    /// The all-zero address
    pub const ZERO: Self = Self([0u8; 20]);

    /// Wrap raw bytes
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build from a byte slice, rejecting anything that is not 20 bytes wide
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let array: [u8; 20] = bytes.try_into().map_err(|_| CoreError::InvalidLength {
            expected: Self::LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    /// Canonical byte representation (the packed 20 bytes)
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<20>(s).map(Self)
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.to_hex()
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}
