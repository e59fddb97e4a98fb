//! JSONL journal reader - sequential reader for replay

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::entry::JournalEntry;
use crate::error::JournalResult;

/// Sequential journal reader
pub struct JournalReader {
    path: PathBuf,
}

impl JournalReader {
    /// Create a reader for the journal file at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read all entries in order (a missing file reads as empty)
    pub fn read_all(&self) -> JournalResult<Vec<JournalEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: JournalEntry = serde_json::from_str(&line)?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Count entries
    pub fn count(&self) -> JournalResult<usize> {
        Ok(self.read_all()?.len())
    }
}
