//! Monitor configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vitalum_storage::RecordStore;

use crate::engine::AlertEngine;
use crate::evaluators::{
    BloodPressureEvaluator, CompoundEvaluator, EcgEvaluator, ManualEvaluator, OxygenEvaluator,
};
use crate::AlertEvaluator;

/// Top-level monitor configuration, deserialized from TOML.
///
/// Every field has a default, so an empty document yields the standard
/// clinical thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// How far back, in hours, each evaluation pass pulls records.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u64,
    #[serde(default)]
    pub blood_pressure: BloodPressureEvaluator,
    #[serde(default)]
    pub oxygen: OxygenEvaluator,
    #[serde(default)]
    pub ecg: EcgEvaluator,
    #[serde(default)]
    pub compound: CompoundEvaluator,
}

fn default_lookback_hours() -> u64 {
    24
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            lookback_hours: default_lookback_hours(),
            blood_pressure: BloodPressureEvaluator::default(),
            oxygen: OxygenEvaluator::default(),
            ecg: EcgEvaluator::default(),
            compound: CompoundEvaluator::default(),
        }
    }
}

impl MonitorConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parses a TOML document, surfacing syntax and type errors as
    /// [`AlertError::InvalidConfig`](crate::error::AlertError::InvalidConfig).
    pub fn from_toml(content: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The full evaluator set at this configuration's thresholds.
    pub fn evaluators(&self) -> Vec<Box<dyn AlertEvaluator>> {
        vec![
            Box::new(self.blood_pressure.clone()),
            Box::new(self.oxygen.clone()),
            Box::new(self.compound.clone()),
            Box::new(self.ecg.clone()),
            Box::new(ManualEvaluator),
        ]
    }

    pub fn build_engine(&self, store: Arc<dyn RecordStore>) -> AlertEngine {
        AlertEngine::new(
            store,
            self.evaluators(),
            chrono::Duration::hours(self.lookback_hours as i64),
        )
    }
}
