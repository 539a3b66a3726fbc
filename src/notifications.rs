use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient, user-visible message (a toast in the host UI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Where user-visible notifications go.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Sink that only logs. Useful for headless hosts.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => tracing::info!(%message, "notification"),
            NotificationKind::Error => tracing::warn!(%message, "notification"),
        }
    }
}

/// Sink that buffers notifications until the host drains them.
#[derive(Debug, Default)]
pub struct QueueSink {
    queue: Mutex<Vec<Notification>>,
}

impl QueueSink {
    pub fn drain(&self) -> Vec<Notification> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => {
                tracing::warn!("notification queue lock poisoned");
                Vec::new()
            }
        }
    }
}

impl NotificationSink for QueueSink {
    fn notify(&self, kind: NotificationKind, message: &str) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push(Notification {
                kind,
                message: message.to_string(),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Non-fatal failures
// ---------------------------------------------------------------------------

/// A failure the flow recovers from locally. Each one becomes exactly one
/// error notification; none of them block or roll back the session.
#[derive(Debug)]
pub enum NonFatal<'a> {
    /// Best-effort persistence of a committed slot failed.
    SlotNotSaved { slot: &'a str, error: &'a AppError },
    /// Saving the synthesized search failed; the user can retry.
    SearchNotSaved { error: &'a AppError },
    InvitationNotSent { name: &'a str, error: &'a AppError },
    /// Some occasions of a wizard submission failed.
    SubmissionPartial { failed: usize, total: usize },
    SubmissionAborted { error: &'a AppError },
}

impl NonFatal<'_> {
    pub fn message(&self) -> String {
        match self {
            NonFatal::SlotNotSaved { slot, .. } => {
                format!("We couldn't save your {slot}, but you can keep going.")
            }
            NonFatal::SearchNotSaved { .. } => {
                "Something went wrong while finding gift ideas. Please try again.".into()
            }
            NonFatal::InvitationNotSent { name, .. } => {
                format!("We couldn't invite {name}. Please try again.")
            }
            NonFatal::SubmissionPartial { failed, total } => {
                format!("{failed} of {total} occasions could not be saved. Please review and try again.")
            }
            NonFatal::SubmissionAborted { .. } => {
                "We couldn't set up auto-gifting. Please try again.".into()
            }
        }
    }

    fn error(&self) -> Option<&AppError> {
        match self {
            NonFatal::SlotNotSaved { error, .. }
            | NonFatal::SearchNotSaved { error }
            | NonFatal::InvitationNotSent { error, .. }
            | NonFatal::SubmissionAborted { error } => Some(error),
            NonFatal::SubmissionPartial { .. } => None,
        }
    }
}

/// Log and surface a non-fatal failure.
pub fn report(sink: &dyn NotificationSink, issue: NonFatal<'_>) {
    let message = issue.message();
    match issue.error() {
        Some(error) => tracing::warn!(kind = error.kind(), error = %error, %message, "Non-fatal failure"),
        None => tracing::warn!(%message, "Non-fatal failure"),
    }
    sink.notify(NotificationKind::Error, &message);
}

pub fn notify_success(sink: &dyn NotificationSink, message: &str) {
    sink.notify(NotificationKind::Success, message);
}
