use crate::history::PatientHistory;
use crate::{AlertEvaluator, Verdict};
use serde::{Deserialize, Serialize};
use vitalum_common::types::{Alert, AlertSeverity, AlertType, PatientId};

const SYSTOLIC: &str = "SystolicBP";
const OXYGEN: &str = "OxygenSaturation";

/// Hypotension combined with hypoxemia, judged over the latest reading of
/// each contributing channel. Both bounds are strict, so the systolic side
/// here is narrower than the inclusive low-systolic threshold alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundEvaluator {
    #[serde(default = "default_systolic_below")]
    pub systolic_below: f64,
    #[serde(default = "default_saturation_below")]
    pub saturation_below: f64,
}

fn default_systolic_below() -> f64 {
    90.0
}

fn default_saturation_below() -> f64 {
    92.0
}

impl Default for CompoundEvaluator {
    fn default() -> Self {
        Self {
            systolic_below: default_systolic_below(),
            saturation_below: default_saturation_below(),
        }
    }
}

impl AlertEvaluator for CompoundEvaluator {
    fn name(&self) -> &str {
        "compound"
    }

    fn evaluate(&self, patient_id: PatientId, history: &PatientHistory) -> Vec<Verdict> {
        let (Some(systolic), Some(oxygen)) = (history.latest(SYSTOLIC), history.latest(OXYGEN))
        else {
            return Vec::new();
        };
        if systolic.value < self.systolic_below && oxygen.value < self.saturation_below {
            let alert = Alert::new(
                patient_id,
                AlertType::HypotensiveHypoxemia,
                format!(
                    "Hypotensive hypoxemia: systolic {} mmHg with oxygen saturation {}%",
                    systolic.value, oxygen.value
                ),
                systolic.timestamp.max(oxygen.timestamp),
                AlertSeverity::Critical,
            );
            vec![Verdict::Raise(alert)]
        } else {
            vec![Verdict::Clear(AlertType::HypotensiveHypoxemia)]
        }
    }
}
