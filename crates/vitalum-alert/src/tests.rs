//! Crate-level tests exercising history, evaluators, and the engine
//! lifecycle against an in-memory store.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use vitalum_common::types::{AlertSeverity, AlertTransition, AlertType, PatientRecord};
use vitalum_storage::memory::MemoryStore;
use vitalum_storage::RecordStore;

use crate::config::MonitorConfig;
use crate::engine::AlertEngine;
use crate::history::{PatientHistory, HISTORY_CAP};

fn make_record(
    patient_id: u32,
    record_type: &str,
    value: f64,
    at: DateTime<Utc>,
) -> PatientRecord {
    PatientRecord {
        patient_id,
        record_type: record_type.to_string(),
        value,
        timestamp: at,
        annotation: None,
    }
}

fn make_marker(patient_id: u32, annotation: &str, at: DateTime<Utc>) -> PatientRecord {
    PatientRecord {
        patient_id,
        record_type: "Alert".to_string(),
        value: 0.0,
        timestamp: at,
        annotation: Some(annotation.to_string()),
    }
}

fn make_engine(store: &Arc<MemoryStore>) -> AlertEngine {
    MonitorConfig::default().build_engine(Arc::clone(store) as Arc<dyn RecordStore>)
}

fn triggered_types(transitions: &[AlertTransition]) -> Vec<AlertType> {
    transitions
        .iter()
        .filter_map(|t| match t {
            AlertTransition::Triggered(alert) => Some(alert.alert_type),
            AlertTransition::Resolved { .. } => None,
        })
        .collect()
}

fn resolved_types(transitions: &[AlertTransition]) -> Vec<AlertType> {
    transitions
        .iter()
        .filter_map(|t| match t {
            AlertTransition::Resolved { alert_type, .. } => Some(*alert_type),
            AlertTransition::Triggered(_) => None,
        })
        .collect()
}

#[test]
fn history_cap_keeps_the_most_recent_records() {
    let start = Utc::now();
    let mut history = PatientHistory::default();
    history.merge((0..150).map(|i| {
        make_record(1, "SystolicBP", 100.0 + i as f64, start + Duration::seconds(i))
    }));

    let records = history.records("SystolicBP");
    assert_eq!(records.len(), HISTORY_CAP);
    assert_eq!(records[0].value, 150.0);
    assert_eq!(records[HISTORY_CAP - 1].value, 249.0);
    assert!(records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn history_dedup_keeps_the_first_record_per_timestamp() {
    let at = Utc::now();
    let mut history = PatientHistory::default();
    history.merge(vec![make_record(1, "SystolicBP", 120.0, at)]);
    history.merge(vec![make_record(1, "SystolicBP", 999.0, at)]);

    let records = history.records("SystolicBP");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value, 120.0);
}

#[test]
fn history_merge_sorts_out_of_order_batches() {
    let start = Utc::now();
    let mut history = PatientHistory::default();
    history.merge(vec![
        make_record(1, "ECG", 72.0, start + Duration::seconds(20)),
        make_record(1, "ECG", 70.0, start),
        make_record(1, "ECG", 71.0, start + Duration::seconds(10)),
    ]);

    let values: Vec<f64> = history.records("ECG").iter().map(|r| r.value).collect();
    assert_eq!(values, [70.0, 71.0, 72.0]);
}

#[test]
fn threshold_alert_triggers_then_resolves_on_recovery() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);
    let start = Utc::now() - Duration::minutes(10);

    store
        .add_record(make_record(1, "SystolicBP", 185.0, start))
        .unwrap();
    let transitions = engine.evaluate_patient(1).unwrap();
    assert_eq!(triggered_types(&transitions), [AlertType::HighSystolicBp]);

    let active = engine.active_for_patient(1);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].severity, AlertSeverity::Critical);
    assert!(active[0].message.contains("185"));

    store
        .add_record(make_record(1, "SystolicBP", 120.0, start + Duration::minutes(5)))
        .unwrap();
    let transitions = engine.evaluate_patient(1).unwrap();
    assert_eq!(resolved_types(&transitions), [AlertType::HighSystolicBp]);
    assert!(engine.active_for_patient(1).is_empty());
}

#[test]
fn repeated_evaluation_with_unchanged_records_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);

    store
        .add_record(make_record(1, "SystolicBP", 185.0, Utc::now()))
        .unwrap();
    let first = engine.evaluate_patient(1).unwrap();
    assert_eq!(first.len(), 1);

    let second = engine.evaluate_patient(1).unwrap();
    assert!(second.is_empty(), "unexpected transitions: {second:?}");
    assert_eq!(engine.active_for_patient(1).len(), 1);
}

#[test]
fn rising_trend_triggers_and_breaks() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);
    let start = Utc::now() - Duration::minutes(30);

    for (i, value) in [140.0, 155.0, 170.0].into_iter().enumerate() {
        store
            .add_record(make_record(
                1,
                "SystolicBP",
                value,
                start + Duration::minutes(i as i64),
            ))
            .unwrap();
    }
    let transitions = engine.evaluate_patient(1).unwrap();
    assert_eq!(triggered_types(&transitions), [AlertType::BpIncreasingTrend]);

    // A flat reading breaks the run.
    store
        .add_record(make_record(1, "SystolicBP", 171.0, start + Duration::minutes(3)))
        .unwrap();
    let transitions = engine.evaluate_patient(1).unwrap();
    assert_eq!(resolved_types(&transitions), [AlertType::BpIncreasingTrend]);
}

#[test]
fn oxygen_drop_within_ten_minutes_triggers() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);
    let now = Utc::now();

    store
        .add_record(make_record(2, "OxygenSaturation", 98.0, now - Duration::seconds(600)))
        .unwrap();
    store
        .add_record(make_record(2, "OxygenSaturation", 92.0, now))
        .unwrap();
    let transitions = engine.evaluate_patient(2).unwrap();
    assert_eq!(triggered_types(&transitions), [AlertType::RapidOxygenDrop]);
}

#[test]
fn low_saturation_and_drop_can_coexist() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);
    let now = Utc::now();

    store
        .add_record(make_record(2, "OxygenSaturation", 97.0, now - Duration::seconds(300)))
        .unwrap();
    store
        .add_record(make_record(2, "OxygenSaturation", 90.0, now))
        .unwrap();
    let transitions = engine.evaluate_patient(2).unwrap();
    let mut types = triggered_types(&transitions);
    types.sort_by_key(|t| t.to_string());
    assert_eq!(
        types,
        [AlertType::LowOxygenSaturation, AlertType::RapidOxygenDrop]
    );
    assert_eq!(engine.active_for_patient(2).len(), 2);
}

#[test]
fn compound_alert_uses_the_later_reading_timestamp() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);
    let start = Utc::now() - Duration::minutes(5);
    let later = start + Duration::seconds(30);

    store
        .add_record(make_record(3, "SystolicBP", 85.0, start))
        .unwrap();
    store
        .add_record(make_record(3, "OxygenSaturation", 91.0, later))
        .unwrap();
    let transitions = engine.evaluate_patient(3).unwrap();
    let types = triggered_types(&transitions);
    assert!(types.contains(&AlertType::HypotensiveHypoxemia));
    assert!(types.contains(&AlertType::LowSystolicBp));
    assert!(types.contains(&AlertType::LowOxygenSaturation));

    let active = engine.active_for_patient(3);
    let compound = active
        .iter()
        .find(|a| a.alert_type == AlertType::HypotensiveHypoxemia)
        .unwrap();
    assert_eq!(compound.timestamp, later);
    assert_eq!(compound.severity, AlertSeverity::Critical);
}

#[test]
fn ecg_spike_triggers_abnormal_peak() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);
    let start = Utc::now() - Duration::minutes(20);

    for i in 0..19 {
        store
            .add_record(make_record(4, "ECG", 70.0, start + Duration::seconds(i)))
            .unwrap();
    }
    store
        .add_record(make_record(4, "ECG", 120.0, start + Duration::seconds(19)))
        .unwrap();
    let transitions = engine.evaluate_patient(4).unwrap();
    assert_eq!(triggered_types(&transitions), [AlertType::EcgAbnormalPeak]);
}

#[test]
fn manual_marker_records_trigger_and_resolve() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);
    let start = Utc::now() - Duration::minutes(2);

    store.add_record(make_marker(5, "triggered", start)).unwrap();
    let transitions = engine.evaluate_patient(5).unwrap();
    assert_eq!(triggered_types(&transitions), [AlertType::ManualTrigger]);

    store
        .add_record(make_marker(5, "resolved", start + Duration::minutes(1)))
        .unwrap();
    let transitions = engine.evaluate_patient(5).unwrap();
    assert_eq!(resolved_types(&transitions), [AlertType::ManualTrigger]);
    assert!(engine.active_for_patient(5).is_empty());
}

#[test]
fn unrecognized_marker_annotation_changes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);
    let start = Utc::now() - Duration::minutes(2);

    store.add_record(make_marker(5, "triggered", start)).unwrap();
    engine.evaluate_patient(5).unwrap();

    store
        .add_record(make_marker(5, "acknowledged", start + Duration::minutes(1)))
        .unwrap();
    let transitions = engine.evaluate_patient(5).unwrap();
    assert!(transitions.is_empty());
    assert_eq!(engine.active_for_patient(5).len(), 1);
}

#[test]
fn patient_with_no_records_evaluates_cleanly() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);

    let transitions = engine.evaluate_patient(999).unwrap();
    assert!(transitions.is_empty());
    assert!(engine.active_for_patient(999).is_empty());
}

#[test]
fn evaluate_all_covers_every_patient() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);
    let now = Utc::now();

    store
        .add_record(make_record(1, "SystolicBP", 185.0, now))
        .unwrap();
    store
        .add_record(make_record(2, "OxygenSaturation", 90.0, now))
        .unwrap();
    let transitions = engine.evaluate_all().unwrap();
    assert_eq!(transitions.len(), 2);

    let all = engine.all_active();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].patient_id, 1);
    assert_eq!(all[1].patient_id, 2);
}

#[test]
fn snapshots_are_independent_copies() {
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(&store);

    store
        .add_record(make_record(1, "SystolicBP", 185.0, Utc::now()))
        .unwrap();
    engine.evaluate_patient(1).unwrap();

    let mut snapshot = engine.active_for_patient(1);
    snapshot[0].message.clear();
    snapshot.clear();
    assert_eq!(engine.active_for_patient(1).len(), 1);
    assert!(engine.active_for_patient(1)[0].message.contains("185"));
}

#[test]
fn patients_evaluate_concurrently_without_interference() {
    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(make_engine(&store));
    let now = Utc::now();

    store
        .add_record(make_record(1, "SystolicBP", 185.0, now))
        .unwrap();
    store
        .add_record(make_record(2, "OxygenSaturation", 90.0, now))
        .unwrap();

    let handles: Vec<_> = [1u32, 2u32]
        .into_iter()
        .map(|patient_id| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    engine.evaluate_patient(patient_id).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let one = engine.active_for_patient(1);
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].alert_type, AlertType::HighSystolicBp);
    let two = engine.active_for_patient(2);
    assert_eq!(two.len(), 1);
    assert_eq!(two[0].alert_type, AlertType::LowOxygenSaturation);
}
