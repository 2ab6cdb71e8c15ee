//! Alert lifecycle state and the evaluation orchestrator.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{Duration, Utc};
use vitalum_common::types::{Alert, AlertTransition, AlertType, PatientId};
use vitalum_storage::RecordStore;

use crate::history::PatientHistory;
use crate::{AlertEvaluator, Verdict};

/// Active alerts for one patient, keyed by alert type.
///
/// At most one alert per type is active at a time; re-triggering an active
/// type refreshes it in place without a new lifecycle transition.
#[derive(Debug, Default)]
pub struct ActiveAlerts {
    by_type: HashMap<AlertType, Alert>,
}

impl ActiveAlerts {
    /// Inserts a new alert or refreshes an ongoing one. Returns a
    /// transition only when the type was not already active.
    pub fn trigger(&mut self, alert: Alert) -> Option<AlertTransition> {
        match self.by_type.entry(alert.alert_type) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().update(alert.message, alert.timestamp);
                None
            }
            Entry::Vacant(entry) => {
                tracing::info!(
                    patient_id = alert.patient_id,
                    alert_type = %alert.alert_type,
                    severity = %alert.severity,
                    "Alert triggered"
                );
                let transition = AlertTransition::Triggered(alert.clone());
                entry.insert(alert);
                Some(transition)
            }
        }
    }

    /// Clears an active alert. No-op when the type is not active.
    pub fn resolve(
        &mut self,
        patient_id: PatientId,
        alert_type: AlertType,
    ) -> Option<AlertTransition> {
        self.by_type.remove(&alert_type).map(|_| {
            tracing::info!(patient_id, alert_type = %alert_type, "Alert resolved");
            AlertTransition::Resolved {
                patient_id,
                alert_type,
            }
        })
    }

    /// Independent copies of the active alerts, in no particular order.
    pub fn snapshot(&self) -> Vec<Alert> {
        self.by_type.values().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Everything the engine tracks for one patient.
#[derive(Debug, Default)]
pub struct PatientState {
    pub history: PatientHistory,
    pub active: ActiveAlerts,
}

/// Evaluation orchestrator and shared alert state.
///
/// Patient state is partitioned: the outer map is held only long enough to
/// find or create a patient's slot, then evaluation serializes on that
/// patient's own lock, so different patients evaluate concurrently.
pub struct AlertEngine {
    evaluators: Vec<Box<dyn AlertEvaluator>>,
    store: Arc<dyn RecordStore>,
    lookback: Duration,
    patients: RwLock<HashMap<PatientId, Arc<Mutex<PatientState>>>>,
}

impl AlertEngine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        evaluators: Vec<Box<dyn AlertEvaluator>>,
        lookback: Duration,
    ) -> Self {
        Self {
            evaluators,
            store,
            lookback,
            patients: RwLock::new(HashMap::new()),
        }
    }

    pub fn evaluators(&self) -> &[Box<dyn AlertEvaluator>] {
        &self.evaluators
    }

    fn patient_state(&self, patient_id: PatientId) -> Arc<Mutex<PatientState>> {
        if let Some(state) = self
            .patients
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(&patient_id)
        {
            return Arc::clone(state);
        }
        let mut patients = self.patients.write().unwrap_or_else(|p| p.into_inner());
        Arc::clone(patients.entry(patient_id).or_default())
    }

    /// Runs one evaluation pass for a patient and returns the lifecycle
    /// transitions it caused. Re-running with unchanged records returns
    /// none. A patient with no records at all is fine: no verdicts, no
    /// active alerts, no error.
    pub fn evaluate_patient(&self, patient_id: PatientId) -> anyhow::Result<Vec<AlertTransition>> {
        let slot = self.patient_state(patient_id);
        let mut guard = slot.lock().unwrap_or_else(|p| p.into_inner());
        let state = &mut *guard;

        let now = Utc::now();
        state.history.merge(
            self.store
                .records_by_type(patient_id)?
                .into_values()
                .flatten(),
        );
        state
            .history
            .merge(self.store.records_in_range(patient_id, now - self.lookback, now)?);

        let mut transitions = Vec::new();
        for evaluator in &self.evaluators {
            for verdict in evaluator.evaluate(patient_id, &state.history) {
                let transition = match verdict {
                    Verdict::Raise(alert) => state.active.trigger(alert),
                    Verdict::Clear(alert_type) => state.active.resolve(patient_id, alert_type),
                };
                transitions.extend(transition);
            }
        }
        tracing::debug!(
            patient_id,
            transitions = transitions.len(),
            "Evaluation pass complete"
        );
        Ok(transitions)
    }

    /// Evaluates every patient the store knows about.
    pub fn evaluate_all(&self) -> anyhow::Result<Vec<AlertTransition>> {
        let mut transitions = Vec::new();
        for patient_id in self.store.patient_ids()? {
            transitions.extend(self.evaluate_patient(patient_id)?);
        }
        Ok(transitions)
    }

    /// Snapshot of one patient's active alerts, ordered by trigger time.
    pub fn active_for_patient(&self, patient_id: PatientId) -> Vec<Alert> {
        let slot = {
            let patients = self.patients.read().unwrap_or_else(|p| p.into_inner());
            patients.get(&patient_id).map(Arc::clone)
        };
        let Some(slot) = slot else {
            return Vec::new();
        };
        let guard = slot.lock().unwrap_or_else(|p| p.into_inner());
        let mut alerts = guard.active.snapshot();
        alerts.sort_by_key(|alert| alert.timestamp);
        alerts
    }

    /// Snapshot of active alerts across all patients.
    pub fn all_active(&self) -> Vec<Alert> {
        let slots: Vec<_> = {
            let patients = self.patients.read().unwrap_or_else(|p| p.into_inner());
            patients.values().map(Arc::clone).collect()
        };
        let mut alerts = Vec::new();
        for slot in slots {
            let guard = slot.lock().unwrap_or_else(|p| p.into_inner());
            alerts.extend(guard.active.snapshot());
        }
        alerts.sort_by_key(|alert| (alert.patient_id, alert.timestamp));
        alerts
    }
}
