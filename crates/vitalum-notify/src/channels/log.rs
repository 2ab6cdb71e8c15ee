use crate::NotificationChannel;
use anyhow::Result;
use async_trait::async_trait;
use vitalum_common::types::{Alert, AlertSeverity, AlertType, PatientId};

/// Writes alert transitions to the process log, at a level matching the
/// alert's severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    async fn alert_triggered(&self, alert: &Alert) -> Result<()> {
        match alert.severity {
            AlertSeverity::Critical => tracing::error!(
                patient_id = alert.patient_id,
                alert_type = %alert.alert_type,
                severity = %alert.severity,
                timestamp = %alert.timestamp,
                "{}",
                alert.message
            ),
            AlertSeverity::High => tracing::warn!(
                patient_id = alert.patient_id,
                alert_type = %alert.alert_type,
                severity = %alert.severity,
                timestamp = %alert.timestamp,
                "{}",
                alert.message
            ),
            _ => tracing::info!(
                patient_id = alert.patient_id,
                alert_type = %alert.alert_type,
                severity = %alert.severity,
                timestamp = %alert.timestamp,
                "{}",
                alert.message
            ),
        }
        Ok(())
    }

    async fn alert_resolved(&self, patient_id: PatientId, alert_type: AlertType) -> Result<()> {
        tracing::info!(patient_id, alert_type = %alert_type, "Alert resolved");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "log"
    }
}
