//! Measurement record storage for the patient-monitoring core.
//!
//! The alert engine consumes history through the [`RecordStore`] trait and
//! never owns persistence itself. [`memory::MemoryStore`] is the built-in
//! in-memory implementation used by tests and single-process deployments;
//! durable backends plug in behind the same trait.

pub mod memory;


use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use vitalum_common::types::{PatientId, PatientRecord};

/// Source of per-patient measurement history.
///
/// Implementations must be safe to share across threads (`Send + Sync`)
/// because the evaluation engine reads from concurrent worker tasks while
/// ingestion appends.
pub trait RecordStore: Send + Sync {
    /// Appends one measurement record.
    fn add_record(&self, record: PatientRecord) -> Result<()>;

    /// Returns a patient's records with timestamps in `[from, to]`,
    /// inclusive at both ends, ordered ascending by timestamp. An unknown
    /// patient yields an empty sequence, not an error.
    fn records_in_range(
        &self,
        patient_id: PatientId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PatientRecord>>;

    /// Returns a patient's records grouped by record type, each group
    /// ordered ascending by timestamp.
    fn records_by_type(&self, patient_id: PatientId) -> Result<HashMap<String, Vec<PatientRecord>>>;

    /// Returns every patient id with at least one stored record.
    fn patient_ids(&self) -> Result<Vec<PatientId>>;
}
