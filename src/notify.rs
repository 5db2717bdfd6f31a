use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;
use strum_macros::Display;

use crate::model::role::Role;

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyTarget {
    User(u64),
    Role(Role),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    LeaveRequested,
    LeaveUpdated,
    LeaveReviewed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub target: NotifyTarget,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: String,
    pub metadata: Value,
}

/// Delivery fan-out lives outside the core. The workflow treats `notify`
/// as fire-and-forget: a failure here never rolls back a leave transition.
pub trait NotificationDispatcher: Send + Sync {
    fn notify(&self, notification: Notification) -> anyhow::Result<()>;
}

/// Default dispatcher: log the event and move on.
#[derive(Default)]
pub struct TracingDispatcher;

impl NotificationDispatcher for TracingDispatcher {
    fn notify(&self, notification: Notification) -> anyhow::Result<()> {
        tracing::info!(
            kind = %notification.kind,
            target = ?notification.target,
            link = %notification.link,
            "{}",
            notification.title
        );
        Ok(())
    }
}

/// Captures every dispatched notification; used by tests and embedders
/// that batch delivery themselves.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn notify(&self, notification: Notification) -> anyhow::Result<()> {
        self.sent
            .lock()
            .map_err(|e| anyhow::anyhow!("recording lock poisoned: {e}"))?
            .push(notification);
        Ok(())
    }
}
