//! Built-in alert evaluators.
//!
//! Each evaluator inspects one clinical concern over a patient's record
//! history and emits [`Verdict`](crate::Verdict)s. Evaluators are pure over
//! the history snapshot they are handed; thresholds are plain struct fields
//! so they can be deserialized straight out of the monitor config.

pub mod blood_pressure;
pub mod compound;
pub mod ecg;
pub mod manual;
pub mod oxygen;

pub use blood_pressure::BloodPressureEvaluator;
pub use compound::CompoundEvaluator;
pub use ecg::EcgEvaluator;
pub use manual::ManualEvaluator;
pub use oxygen::OxygenEvaluator;
