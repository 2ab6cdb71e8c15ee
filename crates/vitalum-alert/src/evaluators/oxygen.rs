use crate::factory::{AlertCondition, AlertFactory};
use crate::history::PatientHistory;
use crate::{AlertEvaluator, Verdict};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use vitalum_common::types::{AlertType, PatientId, PatientRecord};

const OXYGEN: &str = "OxygenSaturation";

/// Oxygen saturation floor plus rapid-desaturation detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OxygenEvaluator {
    /// Saturation strictly below this is hypoxemia.
    #[serde(default = "default_low_saturation")]
    pub low_saturation: f64,
    /// Minimum fall, in saturation points, that counts as a rapid drop.
    #[serde(default = "default_drop_points")]
    pub drop_points: f64,
    /// How far back a drop may reach, inclusive.
    #[serde(default = "default_drop_window_secs")]
    pub drop_window_secs: u64,
}

fn default_low_saturation() -> f64 {
    92.0
}

fn default_drop_points() -> f64 {
    5.0
}

fn default_drop_window_secs() -> u64 {
    600
}

impl Default for OxygenEvaluator {
    fn default() -> Self {
        Self {
            low_saturation: default_low_saturation(),
            drop_points: default_drop_points(),
            drop_window_secs: default_drop_window_secs(),
        }
    }
}

impl OxygenEvaluator {
    /// Scans backward from the reading before `latest`, stopping at the
    /// first record older than the window. The first earlier reading at
    /// least `drop_points` above the latest wins, not the steepest one.
    fn drop_verdict(
        &self,
        patient_id: PatientId,
        readings: &[PatientRecord],
        latest: &PatientRecord,
    ) -> Verdict {
        let cutoff = latest.timestamp - Duration::seconds(self.drop_window_secs as i64);
        for earlier in readings[..readings.len() - 1].iter().rev() {
            if earlier.timestamp < cutoff {
                break;
            }
            if earlier.value - latest.value >= self.drop_points {
                return Verdict::Raise(AlertFactory::build(
                    AlertCondition::RapidDrop,
                    patient_id,
                    latest.value,
                    latest.timestamp,
                ));
            }
        }
        Verdict::Clear(AlertType::RapidOxygenDrop)
    }
}

impl AlertEvaluator for OxygenEvaluator {
    fn name(&self) -> &str {
        "oxygen"
    }

    fn evaluate(&self, patient_id: PatientId, history: &PatientHistory) -> Vec<Verdict> {
        let readings = history.records(OXYGEN);
        let mut verdicts = Vec::new();
        let Some(latest) = readings.last() else {
            return verdicts;
        };
        if latest.value < self.low_saturation {
            verdicts.push(Verdict::Raise(AlertFactory::build(
                AlertCondition::LowSaturation,
                patient_id,
                latest.value,
                latest.timestamp,
            )));
        } else {
            verdicts.push(Verdict::Clear(AlertType::LowOxygenSaturation));
        }
        // A lone reading has nothing to fall from, so the drop check abstains.
        if readings.len() >= 2 {
            verdicts.push(self.drop_verdict(patient_id, readings, latest));
        }
        verdicts
    }
}
