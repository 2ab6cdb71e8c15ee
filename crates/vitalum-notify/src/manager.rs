use crate::error::NotifyError;
use crate::routing::ChannelRoute;
use crate::NotificationChannel;
use vitalum_common::types::AlertTransition;

/// Fans alert transitions out to the registered channels.
///
/// Triggers are filtered per route by severity; resolutions go to every
/// route, so a channel that announced an alert also announces its end.
pub struct NotificationManager {
    channels: Vec<Box<dyn NotificationChannel>>,
    routes: Vec<ChannelRoute>,
}

impl NotificationManager {
    /// Builds a manager, rejecting routes that point at unregistered
    /// channel slots. Misrouted wiring is a deployment defect and should
    /// surface at startup, not as silently dropped notifications.
    pub fn new(
        channels: Vec<Box<dyn NotificationChannel>>,
        routes: Vec<ChannelRoute>,
    ) -> Result<Self, NotifyError> {
        for route in &routes {
            if route.channel_index >= channels.len() {
                return Err(NotifyError::InvalidRoute {
                    channel_index: route.channel_index,
                    channel_count: channels.len(),
                });
            }
        }
        Ok(Self { channels, routes })
    }

    /// Delivers one transition. Per-channel failures are logged and do not
    /// stop delivery to the remaining channels.
    pub async fn dispatch(&self, transition: &AlertTransition) {
        for route in &self.routes {
            if let AlertTransition::Triggered(alert) = transition {
                if !route.should_send(alert.severity) {
                    continue;
                }
            }
            let Some(channel) = self.channels.get(route.channel_index) else {
                continue;
            };
            let outcome = match transition {
                AlertTransition::Triggered(alert) => channel.alert_triggered(alert).await,
                AlertTransition::Resolved {
                    patient_id,
                    alert_type,
                } => channel.alert_resolved(*patient_id, *alert_type).await,
            };
            if let Err(e) = outcome {
                tracing::error!(
                    channel = channel.channel_name(),
                    error = %e,
                    "Failed to send notification"
                );
            }
        }
    }

    pub fn channels(&self) -> &[Box<dyn NotificationChannel>] {
        &self.channels
    }
}
