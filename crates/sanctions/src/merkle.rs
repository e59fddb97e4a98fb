//! Merkle primitives for the sanctions commitment
//!
//! Encoding:
//! - `leaf = keccak256(address_bytes)` over the packed 20 address bytes
//! - `node = keccak256(min(a, b) || max(a, b))` (sorted-pair hashing)
//!
//! Sorting each pair makes proofs position-free: a proof is just the list of
//! sibling hashes from the leaf up to the root, and there is exactly one way
//! to fold it.

use bridgewatch_core::{keccak256, Address, Hash32};

use crate::error::{RegistryError, RegistryResult};

/// Leaf hash for a single identity
pub fn compute_leaf(identity: &Address) -> Hash32 {
    keccak256(identity.as_bytes())
}

/// Combine two nodes in ascending order
pub fn hash_pair(a: &Hash32, b: &Hash32) -> Hash32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo.as_bytes());
    buf[32..].copy_from_slice(hi.as_bytes());
    keccak256(buf)
}

/// Fold a proof onto a leaf, yielding the candidate root.
///
/// An empty proof yields the leaf itself.
pub fn process_proof(leaf: Hash32, proof: &[Hash32]) -> Hash32 {
    proof
        .iter()
        .fold(leaf, |computed, sibling| hash_pair(&computed, sibling))
}

/// Check a proof for `leaf` against `root`
pub fn verify(proof: &[Hash32], root: &Hash32, leaf: Hash32) -> bool {
    process_proof(leaf, proof) == *root
}

/// Parse hex-encoded proof elements, rejecting any element that is not
/// exactly 32 bytes wide.
pub fn parse_proof<S: AsRef<str>>(elements: &[S]) -> RegistryResult<Vec<Hash32>> {
    elements
        .iter()
        .enumerate()
        .map(|(i, element)| {
            element.as_ref().parse::<Hash32>().map_err(|e| {
                RegistryError::MalformedInput(format!("proof element {}: {}", i, e))
            })
        })
        .collect()
}
