use vitalum_common::types::AlertSeverity;

pub struct ChannelRoute {
    pub min_severity: AlertSeverity,
    pub channel_index: usize,
}

impl ChannelRoute {
    pub fn should_send(&self, severity: AlertSeverity) -> bool {
        severity >= self.min_severity
    }
}
