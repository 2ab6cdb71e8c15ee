use crate::RecordStore;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use vitalum_common::types::{PatientId, PatientRecord};

/// In-memory [`RecordStore`] keyed by patient id.
///
/// Per-patient record lists are kept sorted ascending by timestamp on
/// insert. Exact duplicates (same type and timestamp) are stored as
/// delivered; deduplication is the history cache's concern, not the
/// store's. The store is constructed explicitly and handed to whoever
/// needs it; there is no process-wide instance.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use vitalum_common::types::PatientRecord;
/// use vitalum_storage::memory::MemoryStore;
/// use vitalum_storage::RecordStore;
///
/// let store = MemoryStore::new();
/// store
///     .add_record(PatientRecord {
///         patient_id: 7,
///         record_type: "SystolicBP".to_string(),
///         value: 120.0,
///         timestamp: Utc::now(),
///         annotation: None,
///     })
///     .unwrap();
/// assert_eq!(store.patient_ids().unwrap(), vec![7]);
/// ```
pub struct MemoryStore {
    records: RwLock<HashMap<PatientId, Vec<PatientRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn add_record(&self, record: PatientRecord) -> Result<()> {
        let mut records = self.records.write().unwrap_or_else(|p| p.into_inner());
        let list = records.entry(record.patient_id).or_default();
        // Equal timestamps keep arrival order
        let idx = list.partition_point(|r| r.timestamp <= record.timestamp);
        list.insert(idx, record);
        Ok(())
    }

    fn records_in_range(
        &self,
        patient_id: PatientId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PatientRecord>> {
        let records = self.records.read().unwrap_or_else(|p| p.into_inner());
        Ok(records
            .get(&patient_id)
            .map(|list| {
                list.iter()
                    .filter(|r| r.timestamp >= from && r.timestamp <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn records_by_type(&self, patient_id: PatientId) -> Result<HashMap<String, Vec<PatientRecord>>> {
        let records = self.records.read().unwrap_or_else(|p| p.into_inner());
        let mut grouped: HashMap<String, Vec<PatientRecord>> = HashMap::new();
        if let Some(list) = records.get(&patient_id) {
            for record in list {
                grouped
                    .entry(record.record_type.clone())
                    .or_default()
                    .push(record.clone());
            }
        }
        Ok(grouped)
    }

    fn patient_ids(&self) -> Result<Vec<PatientId>> {
        let records = self.records.read().unwrap_or_else(|p| p.into_inner());
        let mut ids: Vec<PatientId> = records.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
