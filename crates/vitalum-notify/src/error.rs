/// Errors raised while assembling the notification subsystem.
///
/// Channel implementations themselves return `anyhow::Result`, since each
/// external service fails in its own ways; this type covers the wiring the
/// manager checks up front.
///
/// # Examples
///
/// ```rust
/// use vitalum_notify::error::NotifyError;
///
/// let err = NotifyError::InvalidRoute { channel_index: 3, channel_count: 1 };
/// assert!(err.to_string().contains("channel 3"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// A route points at a channel slot that was never registered.
    #[error("Notify: route targets channel {channel_index} but only {channel_count} channel(s) are registered")]
    InvalidRoute {
        channel_index: usize,
        channel_count: usize,
    },
}

/// Convenience `Result` alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
