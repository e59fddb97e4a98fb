//! Append-only journal writer
//!
//! Entries are hash-chained and signed as they are appended. A batch of
//! events from one operation is written with a single `write_all` and synced
//! to disk. If the write fails the file is truncated back to its previous
//! length, and the in-memory chain head only advances after success.
//!
//! The file is locked exclusively for as long as the `Journal` lives, so a
//! second writer (in this or another process) fails with `Locked` instead of
//! appending against a stale chain head.

use chrono::Utc;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::entry::{JournalEntry, JournalEvent, GENESIS_PREV_HASH};
use crate::error::{JournalError, JournalResult};
use crate::hash::calculate_entry_hash;
use crate::reader::JournalReader;
use crate::signature::{verify_journal, SystemSigner};

/// Append-only, hash-chained, signed JSONL journal
pub struct Journal {
    path: PathBuf,
    file: Option<File>,
    signer: SystemSigner,
    last_sequence: u64,
    last_hash: String,
}

impl Journal {
    /// Open (or create) the journal at `path`, signing with `signer`.
    ///
    /// Takes the exclusive lock first, then verifies the existing chain and
    /// every signature against `signer`'s public key.
    pub fn open(path: impl AsRef<Path>, signer: SystemSigner) -> JournalResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;
        lock_exclusive(&file, &path)?;

        let entries = JournalReader::from_path(&path).read_all()?;
        verify_journal(&entries, &signer.verifying_key())?;

        let (last_sequence, last_hash) = match entries.last() {
            Some(last) => (last.sequence, last.hash.clone()),
            None => (0, GENESIS_PREV_HASH.to_string()),
        };

        Ok(Self {
            path,
            file: Some(file),
            signer,
            last_sequence,
            last_hash,
        })
    }

    /// Create an in-memory journal (for testing)
    ///
    /// Entries are chained and signed with a fresh key but not stored anywhere.
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            file: None,
            signer: SystemSigner::generate(),
            last_sequence: 0,
            last_hash: GENESIS_PREV_HASH.to_string(),
        }
    }

    /// Append a single event
    pub fn append(&mut self, event: JournalEvent) -> JournalResult<JournalEntry> {
        let mut entries = self.append_all(vec![event])?;
        Ok(entries.remove(0))
    }

    /// Append the events of one operation as a unit
    pub fn append_all(&mut self, events: Vec<JournalEvent>) -> JournalResult<Vec<JournalEntry>> {
        let timestamp = Utc::now();
        let mut sequence = self.last_sequence;
        let mut prev_hash = self.last_hash.clone();
        let mut entries = Vec::with_capacity(events.len());
        let mut buf = Vec::new();

        for event in events {
            sequence += 1;
            let mut entry = JournalEntry {
                sequence,
                prev_hash,
                hash: String::new(),
                timestamp,
                event,
                signature: None,
            };
            entry.hash = calculate_entry_hash(&entry)?;
            entry.signature = Some(self.signer.sign(&entry));

            serde_json::to_writer(&mut buf, &entry)?;
            buf.push(b'\n');

            prev_hash = entry.hash.clone();
            entries.push(entry);
        }

        if let Some(ref mut file) = self.file {
            write_durable(file, &buf)?;
        }

        self.last_sequence = sequence;
        self.last_hash = prev_hash;
        debug!(last_sequence = sequence, count = entries.len(), "Journal appended");

        Ok(entries)
    }

    /// Sequence of the last appended entry (0 if empty)
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Hash of the last appended entry (`GENESIS` if empty)
    pub fn last_hash(&self) -> &str {
        &self.last_hash
    }

    /// Key entries are signed with
    pub fn signer(&self) -> &SystemSigner {
        &self.signer
    }

    /// Get the path to the journal file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if this is an in-memory journal
    pub fn is_in_memory(&self) -> bool {
        self.file.is_none()
    }
}

fn lock_exclusive(file: &File, path: &Path) -> JournalResult<()> {
    match file.try_lock_exclusive() {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
            Err(JournalError::Locked(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Storage the journal appends to
trait Sink: Write {
    fn len(&self) -> std::io::Result<u64>;
    fn truncate(&mut self, len: u64) -> std::io::Result<()>;
    fn sync(&mut self) -> std::io::Result<()>;
}

impl Sink for File {
    fn len(&self) -> std::io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate(&mut self, len: u64) -> std::io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> std::io::Result<()> {
        self.sync_data()
    }
}

/// Write and sync `buf`; on failure cut the sink back so no torn line remains
fn write_durable(sink: &mut impl Sink, buf: &[u8]) -> JournalResult<()> {
    let len = sink.len()?;

    if let Err(e) = sink.write_all(buf).and_then(|()| sink.sync()) {
        warn!(error = %e, "Journal write failed, rolling back");
        sink.truncate(len)?;
        return Err(e.into());
    }

    Ok(())
}
