use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Patient identifier assigned by the upstream admission system.
pub type PatientId = u32;

/// A single timestamped physiological measurement for one patient.
///
/// Records are immutable once created. `record_type` is an open string key
/// (e.g. `"SystolicBP"`, `"OxygenSaturation"`, `"ECG"`) because upstream
/// producers emit measurement types the alert engine does not evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_id: PatientId,
    pub record_type: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    /// Free-text annotation. Staff-entered `"Alert"` records carry the
    /// `"triggered"` / `"resolved"` marker here.
    pub annotation: Option<String>,
}

/// Clinical alert severity, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use vitalum_common::types::AlertSeverity;
///
/// let sev: AlertSeverity = "high".parse().unwrap();
/// assert_eq!(sev, AlertSeverity::High);
/// assert_eq!(sev.to_string(), "high");
/// assert!(AlertSeverity::Critical > AlertSeverity::Low);
/// assert_eq!(AlertSeverity::Medium.escalated(), AlertSeverity::High);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    /// Returns the severity one step up, capped at [`AlertSeverity::Critical`].
    pub fn escalated(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Critical => Self::Critical,
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Low => write!(f, "low"),
            AlertSeverity::Medium => write!(f, "medium"),
            AlertSeverity::High => write!(f, "high"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(AlertSeverity::Low),
            "medium" => Ok(AlertSeverity::Medium),
            "high" => Ok(AlertSeverity::High),
            "critical" => Ok(AlertSeverity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// The closed set of clinical alert conditions the engine tracks.
///
/// At most one active alert exists per (patient, type) pair at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    HighSystolicBp,
    LowSystolicBp,
    HighDiastolicBp,
    LowDiastolicBp,
    BpIncreasingTrend,
    BpDecreasingTrend,
    LowOxygenSaturation,
    RapidOxygenDrop,
    HypotensiveHypoxemia,
    EcgAbnormalPeak,
    ManualTrigger,
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AlertType::HighSystolicBp => "high_systolic_bp",
            AlertType::LowSystolicBp => "low_systolic_bp",
            AlertType::HighDiastolicBp => "high_diastolic_bp",
            AlertType::LowDiastolicBp => "low_diastolic_bp",
            AlertType::BpIncreasingTrend => "bp_increasing_trend",
            AlertType::BpDecreasingTrend => "bp_decreasing_trend",
            AlertType::LowOxygenSaturation => "low_oxygen_saturation",
            AlertType::RapidOxygenDrop => "rapid_oxygen_drop",
            AlertType::HypotensiveHypoxemia => "hypotensive_hypoxemia",
            AlertType::EcgAbnormalPeak => "ecg_abnormal_peak",
            AlertType::ManualTrigger => "manual_trigger",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high_systolic_bp" => Ok(AlertType::HighSystolicBp),
            "low_systolic_bp" => Ok(AlertType::LowSystolicBp),
            "high_diastolic_bp" => Ok(AlertType::HighDiastolicBp),
            "low_diastolic_bp" => Ok(AlertType::LowDiastolicBp),
            "bp_increasing_trend" => Ok(AlertType::BpIncreasingTrend),
            "bp_decreasing_trend" => Ok(AlertType::BpDecreasingTrend),
            "low_oxygen_saturation" => Ok(AlertType::LowOxygenSaturation),
            "rapid_oxygen_drop" => Ok(AlertType::RapidOxygenDrop),
            "hypotensive_hypoxemia" => Ok(AlertType::HypotensiveHypoxemia),
            "ecg_abnormal_peak" => Ok(AlertType::EcgAbnormalPeak),
            "manual_trigger" => Ok(AlertType::ManualTrigger),
            _ => Err(format!("unknown alert type: {s}")),
        }
    }
}

/// A clinical alert for one patient.
///
/// Identity is the (patient_id, alert_type) pair. Once active, an alert is
/// owned by the lifecycle manager; `update` refreshes its message and
/// timestamp without changing identity or severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub patient_id: PatientId,
    pub alert_type: AlertType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub severity: AlertSeverity,
}

impl Alert {
    pub fn new(
        patient_id: PatientId,
        alert_type: AlertType,
        message: String,
        timestamp: DateTime<Utc>,
        severity: AlertSeverity,
    ) -> Self {
        Self {
            patient_id,
            alert_type,
            message,
            timestamp,
            severity,
        }
    }

    /// Refreshes the message and timestamp of an ongoing alert.
    pub fn update(&mut self, message: String, timestamp: DateTime<Utc>) {
        self.message = message;
        self.timestamp = timestamp;
    }
}

/// An observable lifecycle transition produced by an evaluation pass.
///
/// Refreshing an already-active alert produces no transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum AlertTransition {
    /// An alert type became active for a patient.
    Triggered(Alert),
    /// An active alert was cleared.
    Resolved {
        patient_id: PatientId,
        alert_type: AlertType,
    },
}
