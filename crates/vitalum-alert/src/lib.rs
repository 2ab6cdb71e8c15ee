//! Clinical rule evaluation and alert lifecycle engine.
//!
//! The engine keeps a bounded per-patient history cache and runs registered
//! [`AlertEvaluator`] implementations over it on each evaluation pass.
//! Built-in evaluators cover blood-pressure thresholds and trends, oxygen
//! saturation, ECG peak anomalies, hypotensive hypoxemia, and staff-entered
//! manual alerts.

pub mod config;
pub mod decorator;
pub mod engine;
pub mod error;
pub mod evaluators;
pub mod factory;
pub mod history;

#[cfg(test)]
mod tests;

use crate::history::PatientHistory;
use vitalum_common::types::{Alert, AlertType, PatientId};

/// One per-alert-type decision from an evaluation pass.
///
/// The absence of a verdict for a type an evaluator owns means the evaluator
/// abstained: there was not enough data to decide either way, so the
/// engine leaves that type's lifecycle state untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The condition holds; an alert of this type should be active.
    Raise(Alert),
    /// The condition was evaluable and does not hold; any active alert of
    /// this type should be resolved.
    Clear(AlertType),
}

/// A clinical rule evaluated against one patient's record history.
///
/// Implementations are registered in the [`engine::AlertEngine`] and run on
/// every evaluation pass for the patient. Evaluators are pure functions of
/// the supplied history: they never mutate shared state and never fail.
/// Insufficient data is expressed by abstaining, not by an error.
pub trait AlertEvaluator: Send + Sync {
    /// Short evaluator name used in logs (e.g. `"blood-pressure"`).
    fn name(&self) -> &str;

    /// Examines the history and returns raise/clear verdicts for the alert
    /// types this evaluator owns, at most one per type.
    fn evaluate(&self, patient_id: PatientId, history: &PatientHistory) -> Vec<Verdict>;
}
