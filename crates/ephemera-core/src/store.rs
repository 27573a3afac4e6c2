use crate::error::{CoreError, Result};
use crate::record::{Record, RecordId};
use jiff::Timestamp;
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// The authoritative working set of records, most recent first.
///
/// This is the only place records are mutated. The store itself does no I/O:
/// callers persist the [`snapshot`](Self::snapshot) after every mutation that
/// reports a change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from an already ordered sequence.
    ///
    /// Later occurrences of an id that was already seen are dropped.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut seen = HashSet::new();
        let records = records
            .into_iter()
            .filter(|record| {
                let fresh = seen.insert(record.id());
                if !fresh {
                    warn!(id = %record.id(), "dropping duplicate record");
                }
                fresh
            })
            .collect();
        Self { records }
    }

    /// Prepends a record. Fails if a record with the same id is resident.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        if self.records.iter().any(|r| r.id() == record.id()) {
            return Err(CoreError::DuplicateId(record.id()));
        }
        trace!(id = %record.id(), short_url = %record.short_url(), "inserting record");
        self.records.insert(0, record);
        Ok(())
    }

    /// Removes the record with `id`. Returns `false` if it was not present;
    /// removing twice is not an error.
    pub fn remove(&mut self, id: RecordId) -> bool {
        let Some(index) = self.position(id) else {
            trace!(id = %id, "remove: record not present");
            return false;
        };
        self.records.remove(index);
        true
    }

    /// Bumps the click counter of `id` and returns the new count, or `None`
    /// if no such record is resident.
    pub fn increment_clicks(&mut self, id: RecordId) -> Option<u64> {
        let index = self.position(id)?;
        Some(self.records[index].increment_clicks())
    }

    /// Drops every record whose expiry instant is at or before `now` and
    /// returns how many were removed.
    pub fn filter_expired(&mut self, now: Timestamp) -> usize {
        let before = self.records.len();
        self.records.retain(|record| !record.is_expired_at(now));
        let removed = before - self.records.len();
        if removed > 0 {
            debug!(removed, remaining = self.records.len(), "evicted expired records");
        }
        removed
    }

    pub fn snapshot(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }
}
