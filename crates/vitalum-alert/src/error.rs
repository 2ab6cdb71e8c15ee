use crate::factory::{AlertCategory, AlertCondition};

/// Errors surfaced by the alert subsystem.
///
/// Evaluators never produce errors; insufficient data is a silent abstain.
/// These variants cover caller-side defects in factory lookups and
/// configuration parsing, both of which must fail loudly.
///
/// # Examples
///
/// ```rust
/// use vitalum_alert::error::AlertError;
///
/// let err = AlertError::UnknownCondition("heart_rate_spike".to_string());
/// assert!(err.to_string().contains("heart_rate_spike"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    /// The category keyword is not one of the factory's known categories.
    #[error("Alert: unknown alert category '{0}'")]
    UnknownCategory(String),

    /// The condition keyword is not one of the factory's known conditions.
    #[error("Alert: unknown alert condition '{0}'")]
    UnknownCondition(String),

    /// Both keywords are known, but the condition belongs to a different
    /// category.
    #[error("Alert: condition '{condition}' does not belong to category '{category}'")]
    ConditionMismatch {
        category: AlertCategory,
        condition: AlertCondition,
    },

    /// Monitor configuration could not be parsed.
    #[error("Alert: invalid monitor configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

/// Convenience `Result` alias for alert operations.
pub type Result<T> = std::result::Result<T, AlertError>;
