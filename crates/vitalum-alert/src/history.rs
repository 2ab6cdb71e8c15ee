use std::collections::HashMap;
use vitalum_common::types::PatientRecord;

/// Maximum retained records per record type.
pub const HISTORY_CAP: usize = 100;

/// Bounded per-patient measurement cache: record type to an ascending,
/// timestamp-unique record list.
///
/// Merging is idempotent: a record whose exact timestamp is already
/// present for its type is discarded, so re-pulling the same storage range
/// never grows the cache.
#[derive(Debug, Default)]
pub struct PatientHistory {
    by_type: HashMap<String, Vec<PatientRecord>>,
}

impl PatientHistory {
    pub fn new() -> Self {
        Self {
            by_type: HashMap::new(),
        }
    }

    /// Merges records into the cache. Per type, entries are deduplicated by
    /// exact timestamp (first seen wins), kept sorted ascending, and capped
    /// at [`HISTORY_CAP`] with the oldest evicted first.
    pub fn merge<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = PatientRecord>,
    {
        for record in records {
            let list = self.by_type.entry(record.record_type.clone()).or_default();
            if list.iter().any(|r| r.timestamp == record.timestamp) {
                continue;
            }
            let idx = list.partition_point(|r| r.timestamp <= record.timestamp);
            list.insert(idx, record);
            if list.len() > HISTORY_CAP {
                let excess = list.len() - HISTORY_CAP;
                list.drain(..excess);
            }
        }
    }

    /// Records of one type, ascending by timestamp. Empty if none seen.
    pub fn records(&self, record_type: &str) -> &[PatientRecord] {
        self.by_type.get(record_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The most recent record of one type.
    pub fn latest(&self, record_type: &str) -> Option<&PatientRecord> {
        self.records(record_type).last()
    }

    /// Number of cached records of one type.
    pub fn len(&self, record_type: &str) -> usize {
        self.records(record_type).len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.values().all(Vec::is_empty)
    }
}
