//! Composable wrappers over the alert read contract.
//!
//! [`AlertView`] is the surface both plain and decorated alerts present, so
//! a decorated alert is usable anywhere a plain one is and decorators stack
//! in any order.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use vitalum_common::types::{Alert, AlertSeverity, AlertType, PatientId};

pub trait AlertView: Send + Sync {
    fn patient_id(&self) -> PatientId;
    fn alert_type(&self) -> AlertType;
    fn message(&self) -> String;
    fn timestamp(&self) -> DateTime<Utc>;
    fn severity(&self) -> AlertSeverity;
}

impl AlertView for Alert {
    fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    fn alert_type(&self) -> AlertType {
        self.alert_type
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> AlertSeverity {
        self.severity
    }
}

/// Escalates the wrapped alert one severity step and tags its message with
/// a caller-supplied reason.
///
/// Escalation happens once, at construction; repeated reads return the same
/// severity.
pub struct PriorityAlert<A: AlertView> {
    inner: A,
    reason: String,
    severity: AlertSeverity,
}

impl<A: AlertView> PriorityAlert<A> {
    pub fn new(inner: A, reason: impl Into<String>) -> Self {
        let severity = inner.severity().escalated();
        Self {
            inner,
            reason: reason.into(),
            severity,
        }
    }
}

impl<A: AlertView> AlertView for PriorityAlert<A> {
    fn patient_id(&self) -> PatientId {
        self.inner.patient_id()
    }

    fn alert_type(&self) -> AlertType {
        self.inner.alert_type()
    }

    fn message(&self) -> String {
        format!("PRIORITY: {} - {}", self.inner.message(), self.reason)
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.inner.timestamp()
    }

    fn severity(&self) -> AlertSeverity {
        self.severity
    }
}

/// Re-sends the wrapped alert at a fixed interval over a notification
/// queue, up to `max_repeats` times, each repeat carrying a counter suffix.
///
/// The schedule runs as a background task on the current tokio runtime and
/// stops on [`cancel`](Self::cancel), on exhaustion, or when the receiving
/// side goes away. Dropping the wrapper cancels the schedule.
pub struct RepeatingAlert<A: AlertView> {
    inner: A,
    max_repeats: u32,
    delivered: Arc<AtomicU32>,
    cancel: CancellationToken,
}

impl<A: AlertView> RepeatingAlert<A> {
    /// Wraps `inner` and starts the repeat schedule. The first repeat goes
    /// out one full `interval` after this call, not immediately.
    pub fn spawn(
        inner: A,
        interval: Duration,
        max_repeats: u32,
        notifications: mpsc::Sender<Alert>,
    ) -> Self {
        // Snapshot the decorated view once so the schedule reflects any
        // decorators beneath this one.
        let base = Alert::new(
            inner.patient_id(),
            inner.alert_type(),
            inner.message(),
            inner.timestamp(),
            inner.severity(),
        );
        let delivered = Arc::new(AtomicU32::new(0));
        let cancel = CancellationToken::new();

        let task_count = Arc::clone(&delivered);
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            for n in 1..=max_repeats {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
                let mut repeat = base.clone();
                repeat.message = format!("{} [REPEAT {}/{}]", base.message, n, max_repeats);
                if notifications.send(repeat).await.is_err() {
                    break;
                }
                task_count.store(n, Ordering::SeqCst);
            }
        });

        Self {
            inner,
            max_repeats,
            delivered,
            cancel,
        }
    }

    /// Stops any repeat not yet sent. Callable at any time, including after
    /// exhaustion, and idempotent. A repeat already handed to the queue is
    /// not recalled.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Number of repeats sent so far.
    pub fn delivered(&self) -> u32 {
        self.delivered.load(Ordering::SeqCst)
    }
}

impl<A: AlertView> Drop for RepeatingAlert<A> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<A: AlertView> AlertView for RepeatingAlert<A> {
    fn patient_id(&self) -> PatientId {
        self.inner.patient_id()
    }

    fn alert_type(&self) -> AlertType {
        self.inner.alert_type()
    }

    fn message(&self) -> String {
        format!(
            "{} [REPEAT {}/{}]",
            self.inner.message(),
            self.delivered(),
            self.max_repeats
        )
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.inner.timestamp()
    }

    fn severity(&self) -> AlertSeverity {
        self.inner.severity()
    }
}
