use crate::factory::{AlertCondition, AlertFactory};
use crate::history::PatientHistory;
use crate::{AlertEvaluator, Verdict};
use serde::{Deserialize, Serialize};
use vitalum_common::types::{AlertType, PatientId, PatientRecord};

const SYSTOLIC: &str = "SystolicBP";
const DIASTOLIC: &str = "DiastolicBP";

/// Blood pressure thresholds plus short-run trend detection.
///
/// Threshold checks look only at the latest reading of each channel. Trend
/// detection needs `trend_len` consecutive readings of one channel, every
/// consecutive pair moving by strictly more than `trend_step` in the same
/// direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodPressureEvaluator {
    /// Systolic at or above this is critical hypertension.
    #[serde(default = "default_high_systolic")]
    pub high_systolic: f64,
    /// Systolic at or below this is hypotension.
    #[serde(default = "default_low_systolic")]
    pub low_systolic: f64,
    #[serde(default = "default_high_diastolic")]
    pub high_diastolic: f64,
    #[serde(default = "default_low_diastolic")]
    pub low_diastolic: f64,
    /// Minimum per-step change for a run to count as a trend.
    #[serde(default = "default_trend_step")]
    pub trend_step: f64,
    /// Number of consecutive readings a trend is judged over.
    #[serde(default = "default_trend_len")]
    pub trend_len: usize,
}

fn default_high_systolic() -> f64 {
    180.0
}

fn default_low_systolic() -> f64 {
    90.0
}

fn default_high_diastolic() -> f64 {
    120.0
}

fn default_low_diastolic() -> f64 {
    60.0
}

fn default_trend_step() -> f64 {
    10.0
}

fn default_trend_len() -> usize {
    3
}

impl Default for BloodPressureEvaluator {
    fn default() -> Self {
        Self {
            high_systolic: default_high_systolic(),
            low_systolic: default_low_systolic(),
            high_diastolic: default_high_diastolic(),
            low_diastolic: default_low_diastolic(),
            trend_step: default_trend_step(),
            trend_len: default_trend_len(),
        }
    }
}

impl BloodPressureEvaluator {
    fn threshold_verdicts(
        &self,
        patient_id: PatientId,
        history: &PatientHistory,
        verdicts: &mut Vec<Verdict>,
    ) {
        if let Some(latest) = history.latest(SYSTOLIC) {
            if latest.value >= self.high_systolic {
                verdicts.push(Verdict::Raise(AlertFactory::build(
                    AlertCondition::HighSystolic,
                    patient_id,
                    latest.value,
                    latest.timestamp,
                )));
            } else {
                verdicts.push(Verdict::Clear(AlertType::HighSystolicBp));
            }
            if latest.value <= self.low_systolic {
                verdicts.push(Verdict::Raise(AlertFactory::build(
                    AlertCondition::LowSystolic,
                    patient_id,
                    latest.value,
                    latest.timestamp,
                )));
            } else {
                verdicts.push(Verdict::Clear(AlertType::LowSystolicBp));
            }
        }
        if let Some(latest) = history.latest(DIASTOLIC) {
            if latest.value >= self.high_diastolic {
                verdicts.push(Verdict::Raise(AlertFactory::build(
                    AlertCondition::HighDiastolic,
                    patient_id,
                    latest.value,
                    latest.timestamp,
                )));
            } else {
                verdicts.push(Verdict::Clear(AlertType::HighDiastolicBp));
            }
            if latest.value <= self.low_diastolic {
                verdicts.push(Verdict::Raise(AlertFactory::build(
                    AlertCondition::LowDiastolic,
                    patient_id,
                    latest.value,
                    latest.timestamp,
                )));
            } else {
                verdicts.push(Verdict::Clear(AlertType::LowDiastolicBp));
            }
        }
    }

    /// Last `trend_len` readings of a channel, if it has that many.
    fn tail<'a>(&self, history: &'a PatientHistory, channel: &str) -> Option<&'a [PatientRecord]> {
        let records = history.records(channel);
        if records.len() < self.trend_len {
            return None;
        }
        Some(&records[records.len() - self.trend_len..])
    }

    fn trend_verdicts(
        &self,
        patient_id: PatientId,
        history: &PatientHistory,
        verdicts: &mut Vec<Verdict>,
    ) {
        if self.trend_len < 2 {
            return;
        }
        let mut evaluable = false;
        let mut rising: Option<&PatientRecord> = None;
        let mut falling: Option<&PatientRecord> = None;
        for channel in [SYSTOLIC, DIASTOLIC] {
            let Some(tail) = self.tail(history, channel) else {
                continue;
            };
            evaluable = true;
            if rising.is_none()
                && tail
                    .windows(2)
                    .all(|pair| pair[1].value - pair[0].value > self.trend_step)
            {
                rising = tail.last();
            }
            if falling.is_none()
                && tail
                    .windows(2)
                    .all(|pair| pair[0].value - pair[1].value > self.trend_step)
            {
                falling = tail.last();
            }
        }
        // No channel had enough readings: abstain rather than clear.
        if !evaluable {
            return;
        }
        match rising {
            Some(latest) => verdicts.push(Verdict::Raise(AlertFactory::build(
                AlertCondition::IncreasingTrend,
                patient_id,
                latest.value,
                latest.timestamp,
            ))),
            None => verdicts.push(Verdict::Clear(AlertType::BpIncreasingTrend)),
        }
        match falling {
            Some(latest) => verdicts.push(Verdict::Raise(AlertFactory::build(
                AlertCondition::DecreasingTrend,
                patient_id,
                latest.value,
                latest.timestamp,
            ))),
            None => verdicts.push(Verdict::Clear(AlertType::BpDecreasingTrend)),
        }
    }
}

impl AlertEvaluator for BloodPressureEvaluator {
    fn name(&self) -> &str {
        "blood-pressure"
    }

    fn evaluate(&self, patient_id: PatientId, history: &PatientHistory) -> Vec<Verdict> {
        let mut verdicts = Vec::new();
        self.threshold_verdicts(patient_id, history, &mut verdicts);
        self.trend_verdicts(patient_id, history, &mut verdicts);
        verdicts
    }
}
