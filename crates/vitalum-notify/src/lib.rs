//! Notification delivery with pluggable channel support.
//!
//! Alert lifecycle transitions are routed to one or more
//! [`NotificationChannel`] implementations based on severity and routing
//! configuration. The built-in [`channels::LogChannel`] writes to the
//! process log; clinical deployments add pager or messaging channels behind
//! the same trait.

pub mod channels;
pub mod error;
pub mod manager;
pub mod routing;


use anyhow::Result;
use async_trait::async_trait;
use vitalum_common::types::{Alert, AlertType, PatientId};

/// A delivery channel that forwards alert transitions to an external
/// destination (log, pager, ward dashboard).
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Delivers a newly triggered alert.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails; the manager logs and moves on.
    async fn alert_triggered(&self, alert: &Alert) -> Result<()>;

    /// Delivers the resolution of a previously triggered alert.
    async fn alert_resolved(&self, patient_id: PatientId, alert_type: AlertType) -> Result<()>;

    /// Returns the channel type name (e.g., `"log"`).
    fn channel_name(&self) -> &str;
}
