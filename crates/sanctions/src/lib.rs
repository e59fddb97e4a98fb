//! BridgeWatch Sanctions Registry
//!
//! Layer 1 of the screening pipeline: cryptographic membership checks
//! against a sanctioned-entity set that is never stored here.
//!
//! ```text
//!   List curator (off-line)              Registry (this crate)
//!   ├── SanctionsTree::new(addresses)    ├── root: Hash32
//!   ├── tree.root() ───────────────────► ├── update_commitment(admin, root)
//!   └── tree.proof(addr) ──┐             └── verify_membership(addr, proof)
//!                          └────────────────────────▲
//! ```
//!
//! ## Key Components
//!
//! - [`merkle`] - Leaf encoding and sorted-pair proof folding
//! - [`tree::SanctionsTree`] - Proof construction for list curators
//! - [`registry::SanctionsRegistry`] - Commitment state and verification
//! - [`event::RegistryEvent`] - Audit events emitted by the registry

pub mod error;
pub mod event;
pub mod merkle;
pub mod registry;
pub mod tree;

pub use error::{RegistryError, RegistryResult};
pub use event::RegistryEvent;
pub use merkle::{compute_leaf, hash_pair, parse_proof, process_proof};
pub use registry::{MembershipOracle, SanctionsRegistry};
pub use tree::SanctionsTree;
