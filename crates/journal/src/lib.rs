//! BridgeWatch Journal - hash-chained JSONL event log
//!
//! The journal is the Source of Truth for durable state. Registry and
//! engine are rebuilt by replaying it; nothing else is persisted.
//!
//! Each line is a [`JournalEntry`] whose `hash` covers its content and the
//! previous entry's hash, so any edit or deletion breaks the chain. Each
//! entry is also signed by the system key, so a rewritten suffix with
//! recomputed hashes is still rejected.
//!
//! An open [`Journal`] holds an exclusive lock on its file: one writer per
//! journal, across processes.

pub mod entry;
pub mod error;
pub mod hash;
pub mod reader;
pub mod signature;
pub mod store;

pub use entry::{JournalEntry, JournalEvent, GENESIS_PREV_HASH};
pub use error::{JournalError, JournalResult};
pub use hash::{calculate_entry_hash, verify_chain, ChainError};
pub use reader::JournalReader;
pub use signature::{verify_journal, EntrySignature, SignatureError, SystemSigner};
pub use store::Journal;
