//! BridgeWatch Core - Domain types
//!
//! This crate contains the fixed-width value types used across BridgeWatch:
//! - `Hash32`: 32-byte digest (commitment roots, leaves, proof siblings)
//! - `Address`: 20-byte identity (senders, recipients, sanctioned entities, principals)
//! - `TransferId`: unique key of a screened transfer
//! - `Emitted`: operation result carrying its audit events

pub mod address;
pub mod emitted;
pub mod error;
pub mod hash;
pub mod transfer;

pub use address::Address;
pub use emitted::Emitted;
pub use error::CoreError;
pub use hash::{keccak256, Hash32};
pub use transfer::TransferId;
