//! Notification channel between the workflow and the presentation layer.

use tokio::sync::broadcast;

use crate::errors::{ErrorKind, WorkflowError};

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A user-facing message about something that finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    /// Record or resource the notice is about (mentorship id, event id, ...)
    pub subject: String,
    pub text: String,
    /// Set for error notices
    pub error_kind: Option<ErrorKind>,
}

/// Cloneable publisher. Notices sent with no subscriber are dropped.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier {
    /// Channel holding up to `capacity` undelivered notices (at least one).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn success(&self, subject: impl Into<String>, text: impl Into<String>) {
        self.publish(Notice {
            level: NoticeLevel::Success,
            subject: subject.into(),
            text: text.into(),
            error_kind: None,
        });
    }

    pub fn failure(&self, subject: impl Into<String>, error: &WorkflowError) {
        self.publish(Notice {
            level: NoticeLevel::Error,
            subject: subject.into(),
            text: error.message.clone(),
            error_kind: Some(error.kind),
        });
    }

    fn publish(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            tracing::trace!("Notice dropped, no subscribers");
        }
    }
}
