//! Decision Ledger - append-only record store
//!
//! One record per transfer id. Records are never updated or removed; a
//! second insert for the same id is refused and leaves the first untouched.

use std::collections::HashMap;

use bridgewatch_core::TransferId;

use crate::decision::DecisionRecord;
use crate::error::{ComplianceError, ComplianceResult};

/// In-memory append-only ledger of decision records
#[derive(Debug, Clone, Default)]
pub struct DecisionLedger {
    /// Insertion order
    records: Vec<DecisionRecord>,
    /// transfer id -> position in `records`
    index: HashMap<TransferId, usize>,
    /// Successful inserts, never decremented
    total: u64,
}

impl DecisionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a record exists for `transfer_id`
    pub fn contains(&self, transfer_id: &TransferId) -> bool {
        self.index.contains_key(transfer_id)
    }

    /// Append a record, refusing duplicates
    pub fn insert(&mut self, record: DecisionRecord) -> ComplianceResult<()> {
        if self.contains(&record.transfer_id) {
            return Err(ComplianceError::DuplicateRecord(record.transfer_id));
        }

        self.index.insert(record.transfer_id, self.records.len());
        self.records.push(record);
        self.total += 1;
        Ok(())
    }

    /// Look up a record
    pub fn get(&self, transfer_id: &TransferId) -> Option<&DecisionRecord> {
        self.index.get(transfer_id).map(|&i| &self.records[i])
    }

    /// Number of successful inserts
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Records in the order they were appended
    pub fn iter(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
