use crate::error::AlertError;
use chrono::{DateTime, Utc};
use vitalum_common::types::{Alert, AlertSeverity, AlertType, PatientId};

/// Coarse alert category, the first key of the factory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertCategory {
    BloodPressure,
    BloodOxygen,
    Ecg,
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BloodPressure => write!(f, "bloodpressure"),
            Self::BloodOxygen => write!(f, "bloodoxygen"),
            Self::Ecg => write!(f, "ecg"),
        }
    }
}

impl std::str::FromStr for AlertCategory {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bloodpressure" => Ok(Self::BloodPressure),
            "bloodoxygen" => Ok(Self::BloodOxygen),
            "ecg" => Ok(Self::Ecg),
            _ => Err(AlertError::UnknownCategory(s.to_string())),
        }
    }
}

/// Fine-grained condition keyword; each belongs to exactly one category
/// and maps to one alert type, severity, and canonical message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertCondition {
    HighSystolic,
    LowSystolic,
    HighDiastolic,
    LowDiastolic,
    IncreasingTrend,
    DecreasingTrend,
    LowSaturation,
    RapidDrop,
    AbnormalPeak,
}

impl AlertCondition {
    pub fn category(&self) -> AlertCategory {
        match self {
            Self::HighSystolic
            | Self::LowSystolic
            | Self::HighDiastolic
            | Self::LowDiastolic
            | Self::IncreasingTrend
            | Self::DecreasingTrend => AlertCategory::BloodPressure,
            Self::LowSaturation | Self::RapidDrop => AlertCategory::BloodOxygen,
            Self::AbnormalPeak => AlertCategory::Ecg,
        }
    }

    pub fn alert_type(&self) -> AlertType {
        match self {
            Self::HighSystolic => AlertType::HighSystolicBp,
            Self::LowSystolic => AlertType::LowSystolicBp,
            Self::HighDiastolic => AlertType::HighDiastolicBp,
            Self::LowDiastolic => AlertType::LowDiastolicBp,
            Self::IncreasingTrend => AlertType::BpIncreasingTrend,
            Self::DecreasingTrend => AlertType::BpDecreasingTrend,
            Self::LowSaturation => AlertType::LowOxygenSaturation,
            Self::RapidDrop => AlertType::RapidOxygenDrop,
            Self::AbnormalPeak => AlertType::EcgAbnormalPeak,
        }
    }

    pub fn severity(&self) -> AlertSeverity {
        match self {
            Self::HighSystolic => AlertSeverity::Critical,
            Self::LowSystolic => AlertSeverity::High,
            Self::HighDiastolic => AlertSeverity::High,
            Self::LowDiastolic => AlertSeverity::Medium,
            Self::IncreasingTrend | Self::DecreasingTrend => AlertSeverity::Medium,
            Self::LowSaturation | Self::RapidDrop => AlertSeverity::High,
            Self::AbnormalPeak => AlertSeverity::High,
        }
    }

    /// Canonical message with the measured value interpolated.
    pub fn message(&self, value: f64) -> String {
        match self {
            Self::HighSystolic => format!("Critical high systolic blood pressure: {value} mmHg"),
            Self::LowSystolic => format!("Low systolic blood pressure: {value} mmHg"),
            Self::HighDiastolic => format!("High diastolic blood pressure: {value} mmHg"),
            Self::LowDiastolic => format!("Low diastolic blood pressure: {value} mmHg"),
            Self::IncreasingTrend => {
                format!("Increasing blood pressure trend detected (latest: {value} mmHg)")
            }
            Self::DecreasingTrend => {
                format!("Decreasing blood pressure trend detected (latest: {value} mmHg)")
            }
            Self::LowSaturation => format!("Low oxygen saturation: {value}%"),
            Self::RapidDrop => {
                format!("Rapid oxygen saturation drop: {value}% within 10 minutes")
            }
            Self::AbnormalPeak => {
                format!("Abnormal ECG peak detected: {value} (exceeds normal threshold)")
            }
        }
    }
}

impl std::fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::HighSystolic => "high_systolic",
            Self::LowSystolic => "low_systolic",
            Self::HighDiastolic => "high_diastolic",
            Self::LowDiastolic => "low_diastolic",
            Self::IncreasingTrend => "increasing_trend",
            Self::DecreasingTrend => "decreasing_trend",
            Self::LowSaturation => "low_saturation",
            Self::RapidDrop => "rapid_drop",
            Self::AbnormalPeak => "abnormal_peak",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AlertCondition {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high_systolic" => Ok(Self::HighSystolic),
            "low_systolic" => Ok(Self::LowSystolic),
            "high_diastolic" => Ok(Self::HighDiastolic),
            "low_diastolic" => Ok(Self::LowDiastolic),
            "increasing_trend" => Ok(Self::IncreasingTrend),
            "decreasing_trend" => Ok(Self::DecreasingTrend),
            "low_saturation" => Ok(Self::LowSaturation),
            "rapid_drop" => Ok(Self::RapidDrop),
            "abnormal_peak" => Ok(Self::AbnormalPeak),
            _ => Err(AlertError::UnknownCondition(s.to_string())),
        }
    }
}

/// Builds fully-formed alerts with the canonical message and severity per
/// condition, so evaluators and ad-hoc callers stay consistent.
pub struct AlertFactory;

impl AlertFactory {
    /// Builds the canonical alert for a condition. Enum-dispatched and
    /// infallible; this is the path the built-in evaluators use.
    pub fn build(
        condition: AlertCondition,
        patient_id: PatientId,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Alert {
        Alert::new(
            patient_id,
            condition.alert_type(),
            condition.message(value),
            timestamp,
            condition.severity(),
        )
    }

    /// String-keyed entry point for callers outside the closed enums.
    ///
    /// Fails loudly on an unrecognized category or condition keyword, or
    /// when the condition belongs to a different category. All three
    /// signal a defect in the caller, never a runtime data issue.
    pub fn build_named(
        category: &str,
        condition: &str,
        patient_id: PatientId,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Alert, AlertError> {
        let category: AlertCategory = category.parse()?;
        let condition: AlertCondition = condition.parse()?;
        if condition.category() != category {
            return Err(AlertError::ConditionMismatch {
                category,
                condition,
            });
        }
        Ok(Self::build(condition, patient_id, value, timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_named_covers_the_full_condition_table() {
        let ts = Utc::now();
        let rows = [
            ("bloodpressure", "high_systolic", AlertType::HighSystolicBp, AlertSeverity::Critical),
            ("bloodpressure", "low_systolic", AlertType::LowSystolicBp, AlertSeverity::High),
            ("bloodpressure", "high_diastolic", AlertType::HighDiastolicBp, AlertSeverity::High),
            ("bloodpressure", "low_diastolic", AlertType::LowDiastolicBp, AlertSeverity::Medium),
            ("bloodpressure", "increasing_trend", AlertType::BpIncreasingTrend, AlertSeverity::Medium),
            ("bloodpressure", "decreasing_trend", AlertType::BpDecreasingTrend, AlertSeverity::Medium),
            ("bloodoxygen", "low_saturation", AlertType::LowOxygenSaturation, AlertSeverity::High),
            ("bloodoxygen", "rapid_drop", AlertType::RapidOxygenDrop, AlertSeverity::High),
            ("ecg", "abnormal_peak", AlertType::EcgAbnormalPeak, AlertSeverity::High),
        ];
        for (category, condition, alert_type, severity) in rows {
            let alert = AlertFactory::build_named(category, condition, 42, 100.0, ts).unwrap();
            assert_eq!(alert.alert_type, alert_type, "{category}/{condition}");
            assert_eq!(alert.severity, severity, "{category}/{condition}");
            assert_eq!(alert.patient_id, 42);
            assert_eq!(alert.timestamp, ts);
            assert!(alert.message.contains("100"), "{}", alert.message);
        }
    }

    #[test]
    fn unknown_category_fails_loudly() {
        let err = AlertFactory::build_named("temperature", "high_systolic", 1, 39.5, Utc::now())
            .unwrap_err();
        assert!(matches!(err, AlertError::UnknownCategory(_)));
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn unknown_condition_fails_loudly() {
        let err =
            AlertFactory::build_named("ecg", "flatline", 1, 0.0, Utc::now()).unwrap_err();
        assert!(matches!(err, AlertError::UnknownCondition(_)));
        assert!(err.to_string().contains("flatline"));
    }

    #[test]
    fn condition_in_wrong_category_is_rejected() {
        let err = AlertFactory::build_named("ecg", "high_systolic", 1, 190.0, Utc::now())
            .unwrap_err();
        assert!(matches!(err, AlertError::ConditionMismatch { .. }));
        assert!(err.to_string().contains("high_systolic"));
        assert!(err.to_string().contains("ecg"));
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        let category: AlertCategory = "BloodPressure".parse().unwrap();
        assert_eq!(category, AlertCategory::BloodPressure);
    }
}
