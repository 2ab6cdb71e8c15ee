use crate::history::PatientHistory;
use crate::{AlertEvaluator, Verdict};
use vitalum_common::types::{Alert, AlertSeverity, AlertType, PatientId};

const ALERT_CHANNEL: &str = "Alert";

/// Staff- or patient-initiated alerts, carried as `"Alert"` records whose
/// annotation reads `"triggered"` or `"resolved"` (case-insensitive). Any
/// other annotation is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualEvaluator;

impl AlertEvaluator for ManualEvaluator {
    fn name(&self) -> &str {
        "manual"
    }

    fn evaluate(&self, patient_id: PatientId, history: &PatientHistory) -> Vec<Verdict> {
        let Some(record) = history.latest(ALERT_CHANNEL) else {
            return Vec::new();
        };
        let Some(annotation) = record.annotation.as_deref() else {
            return Vec::new();
        };
        if annotation.eq_ignore_ascii_case("triggered") {
            vec![Verdict::Raise(Alert::new(
                patient_id,
                AlertType::ManualTrigger,
                "Manual alert triggered by patient or staff".to_string(),
                record.timestamp,
                AlertSeverity::High,
            ))]
        } else if annotation.eq_ignore_ascii_case("resolved") {
            vec![Verdict::Clear(AlertType::ManualTrigger)]
        } else {
            Vec::new()
        }
    }
}
