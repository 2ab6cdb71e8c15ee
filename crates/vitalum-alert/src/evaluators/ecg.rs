use crate::factory::{AlertCondition, AlertFactory};
use crate::history::PatientHistory;
use crate::{AlertEvaluator, Verdict};
use serde::{Deserialize, Serialize};
use vitalum_common::types::{AlertType, PatientId};

const ECG: &str = "ECG";

/// Statistical anomaly detection over a rolling ECG sample window.
///
/// Computes the population mean and standard deviation of the most recent
/// `window` samples and flags the latest sample when it deviates from the
/// mean by more than `deviation_factor` standard deviations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcgEvaluator {
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_deviation_factor")]
    pub deviation_factor: f64,
}

fn default_window() -> usize {
    20
}

fn default_deviation_factor() -> f64 {
    2.0
}

impl Default for EcgEvaluator {
    fn default() -> Self {
        Self {
            window: default_window(),
            deviation_factor: default_deviation_factor(),
        }
    }
}

impl AlertEvaluator for EcgEvaluator {
    fn name(&self) -> &str {
        "ecg"
    }

    fn evaluate(&self, patient_id: PatientId, history: &PatientHistory) -> Vec<Verdict> {
        let samples = history.records(ECG);
        if self.window == 0 || samples.len() < self.window {
            return Vec::new();
        }
        let tail = &samples[samples.len() - self.window..];

        let n = tail.len() as f64;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for sample in tail {
            sum += sample.value;
            sum_sq += sample.value * sample.value;
        }
        let mean = sum / n;
        let mean_sq = sum_sq / n;
        // Clamp negative rounding artifacts before the square root.
        let variance = (mean_sq - mean * mean).max(0.0);
        let std_dev = variance.sqrt();

        let mut verdicts = Vec::new();
        if let Some(latest) = tail.last() {
            let deviation = (latest.value - mean).abs();
            if deviation > self.deviation_factor * std_dev {
                verdicts.push(Verdict::Raise(AlertFactory::build(
                    AlertCondition::AbnormalPeak,
                    patient_id,
                    latest.value,
                    latest.timestamp,
                )));
            } else {
                verdicts.push(Verdict::Clear(AlertType::EcgAbnormalPeak));
            }
        }
        verdicts
    }
}
