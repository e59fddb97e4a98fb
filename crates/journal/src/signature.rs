//! Digital signatures for journal entries
//!
//! Every entry is signed by the system key over `(sequence, prev_hash, hash)`.
//! Verification pins the expected public key, so entries whose hashes were
//! recomputed or re-signed by another key are rejected.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::entry::JournalEntry;
use crate::error::JournalResult;
use crate::hash::verify_chain;

/// Signer id of the system key
pub const SYSTEM_SIGNER_ID: &str = "SYSTEM";

/// Signature attached to a journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySignature {
    /// Signer identifier
    pub signer_id: String,
    /// Ed25519 public key (hex)
    pub public_key: String,
    /// Ed25519 signature (hex)
    pub signature: String,
}

/// Signature verification failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Entry at seq {sequence} is not signed")]
    Missing { sequence: u64 },

    #[error("Entry at seq {sequence} is signed by untrusted key {public_key}")]
    UntrustedKey { sequence: u64, public_key: String },

    #[error("Invalid signature at seq {sequence}: {reason}")]
    Invalid { sequence: u64, reason: String },

    #[error("Invalid system key: {0}")]
    InvalidKey(String),
}

/// Bytes covered by an entry signature. `hash` already commits to the
/// timestamp and the event.
fn signable_bytes(entry: &JournalEntry) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(8 + entry.prev_hash.len() + entry.hash.len());
    bytes.extend_from_slice(&entry.sequence.to_le_bytes());
    bytes.extend_from_slice(entry.prev_hash.as_bytes());
    bytes.extend_from_slice(entry.hash.as_bytes());
    bytes
}

/// System signer using Ed25519
pub struct SystemSigner {
    signing_key: SigningKey,
}

impl SystemSigner {
    /// Create from a 32-byte seed (hex-encoded)
    pub fn from_hex(hex_seed: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(hex_seed.trim())
            .map_err(|e| SignatureError::InvalidKey(format!("invalid hex: {}", e)))?;

        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SignatureError::InvalidKey("key must be 32 bytes".to_string()))?;

        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Generate a new random signing key
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Load the seed stored at `path`
    pub fn load(path: impl AsRef<Path>) -> JournalResult<Self> {
        let seed = std::fs::read_to_string(path)?;
        Ok(Self::from_hex(&seed)?)
    }

    /// Load the seed stored at `path`, generating and saving one if absent
    pub fn load_or_generate(path: impl AsRef<Path>) -> JournalResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // create_new: a concurrent first run keeps whichever key landed first
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Self::load(path),
            Err(e) => return Err(e.into()),
        };

        let signer = Self::generate();
        file.write_all(signer.seed_hex().as_bytes())?;
        file.sync_data()?;
        restrict_permissions(path)?;

        info!(
            path = %path.display(),
            public_key = %signer.public_key_hex(),
            "Generated system key"
        );
        Ok(signer)
    }

    /// Export the seed as hex (for storage)
    pub fn seed_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    /// Key that verification trusts for entries written by this signer
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Sign an entry whose hash is already set
    pub fn sign(&self, entry: &JournalEntry) -> EntrySignature {
        let signature = self.signing_key.sign(&signable_bytes(entry));

        EntrySignature {
            signer_id: SYSTEM_SIGNER_ID.to_string(),
            public_key: self.public_key_hex(),
            signature: hex::encode(signature.to_bytes()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl JournalEntry {
    /// Verify this entry's signature against the trusted system key
    pub fn verify_signature(&self, trusted: &VerifyingKey) -> Result<(), SignatureError> {
        let sequence = self.sequence;
        let sig = self
            .signature
            .as_ref()
            .ok_or(SignatureError::Missing { sequence })?;

        if sig.public_key != hex::encode(trusted.to_bytes()) {
            return Err(SignatureError::UntrustedKey {
                sequence,
                public_key: sig.public_key.clone(),
            });
        }

        let invalid = |reason: String| SignatureError::Invalid { sequence, reason };

        let sig_bytes =
            hex::decode(&sig.signature).map_err(|e| invalid(format!("invalid hex: {}", e)))?;
        let sig_array: [u8; 64] = sig_bytes
            .try_into()
            .map_err(|_| invalid("signature must be 64 bytes".to_string()))?;

        trusted
            .verify(&signable_bytes(self), &Signature::from_bytes(&sig_array))
            .map_err(|e| invalid(e.to_string()))
    }
}

/// Verify the hash chain, then every signature against `trusted`
pub fn verify_journal(entries: &[JournalEntry], trusted: &VerifyingKey) -> JournalResult<()> {
    verify_chain(entries)?;
    for entry in entries {
        entry.verify_signature(trusted)?;
    }
    Ok(())
}
