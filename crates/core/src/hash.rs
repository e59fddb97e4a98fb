//! Hash32 - 32-byte digest
//!
//! Roots, leaves and proof siblings are all `Hash32`. The all-zero value
//! means "nothing committed".

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

use crate::error::{decode_fixed, CoreError};

/// A 32-byte hash value.
///
/// Ordering is byte-wise, which is the same as comparing the values as
/// big-endian unsigned integers.
///
/// # Example
/// ```
/// use bridgewatch_core::Hash32;
///
/// let zero: Hash32 = "0x0000000000000000000000000000000000000000000000000000000000000000"
///     .parse()
///     .unwrap();
/// assert!(zero.is_zero());
///
/// // Wrong width is rejected
/// assert!("0xdeadbeef".parse::<Hash32>().is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hash32([u8; 32]);

impl Hash32 {
    /// The all-zero hash
    pub const ZERO: Self = Self([0u8; 32]);

    /// Wrap raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build from a byte slice, rejecting anything that is not 32 bytes wide
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let array: [u8; 32] = bytes.try_into().map_err(|_| CoreError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns true for the all-zero hash
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// `0x`-prefixed lowercase hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

/// Keccak-256 of arbitrary bytes
pub fn keccak256(data: impl AsRef<[u8]>) -> Hash32 {
    let mut hasher = Keccak256::new();
    hasher.update(data.as_ref());
    Hash32(hasher.finalize().into())
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", self.to_hex())
    }
}

impl FromStr for Hash32 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<32>(s).map(Self)
    }
}

impl TryFrom<String> for Hash32 {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Hash32> for String {
    fn from(h: Hash32) -> Self {
        h.to_hex()
    }
}

impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_default() {
        assert_eq!(Hash32::default(), Hash32::ZERO);
        assert!(Hash32::ZERO.is_zero());
    }

    #[test]
    fn test_keccak_empty_input() {
        // Well-known Keccak-256 of the empty string
        assert_eq!(
            keccak256(b"").to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_parse_with_and_without_prefix() {
        let hex = "11".repeat(32);
        let a: Hash32 = hex.parse().unwrap();
        let b: Hash32 = format!("0x{}", hex).parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes(), &[0x11u8; 32]);
    }

    #[test]
    fn test_parse_wrong_width() {
        let err = "0xabcd".parse::<Hash32>().unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn test_parse_bad_hex() {
        let err = "0xzz".parse::<Hash32>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidHex(_)));
    }

    #[test]
    fn test_from_slice_width() {
        assert!(Hash32::from_slice(&[0u8; 31]).is_err());
        assert!(Hash32::from_slice(&[0u8; 32]).is_ok());
    }

    #[test]
    fn test_ordering_is_big_endian() {
        let mut low = [0u8; 32];
        low[31] = 0xff;
        let mut high = [0u8; 32];
        high[0] = 0x01;
        assert!(Hash32::new(low) < Hash32::new(high));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let h = keccak256(b"test");
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", h.to_hex()));

        let parsed: Hash32 = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, h);

        assert!(serde_json::from_str::<Hash32>("\"0x1234\"").is_err());
    }
}
