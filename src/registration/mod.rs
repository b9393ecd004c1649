//! Event registration with optimistic dismiss.
//!
//! Confirming a registration closes the modal after a fixed delay without waiting for
//! the server. The request keeps running as a `BackgroundTask`, and its real outcome
//! is published on the notification channel when it settles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::api::EventApi;
use crate::notify::Notifier;
use crate::tasks::{BackgroundTask, TaskStatus};

pub struct RegistrationFlow<A> {
    api: A,
    notifier: Notifier,
    close_delay: Duration,
    modal_open: AtomicBool,
}

impl<A> RegistrationFlow<A>
where
    A: EventApi + Clone + 'static,
{
    pub fn new(api: A, notifier: Notifier, close_delay: Duration) -> Self {
        Self {
            api,
            notifier,
            close_delay,
            modal_open: AtomicBool::new(false),
        }
    }

    /// Show the confirmation modal.
    pub fn open(&self) {
        self.modal_open.store(true, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.modal_open.load(Ordering::SeqCst)
    }

    /// Start the registration and close the modal after the fixed delay.
    ///
    /// Returns once the modal is closed; the returned task may still be pending.
    pub async fn confirm(&self, event_id: &str) -> BackgroundTask<String> {
        let api = self.api.clone();
        let notifier = self.notifier.clone();
        let id = event_id.to_string();
        let subject = id.clone();

        // The notice goes out only if the request, not a cancel, settled the task.
        let task = BackgroundTask::spawn_then(
            format!("register:{}", event_id),
            async move { api.register_for_event(&id).await },
            move |status| match status {
                TaskStatus::Succeeded(message) => notifier.success(&subject, message),
                TaskStatus::Failed(e) => notifier.failure(&subject, e),
                TaskStatus::Pending | TaskStatus::Cancelled => {}
            },
        );

        tokio::time::sleep(self.close_delay).await;
        self.modal_open.store(false, Ordering::SeqCst);
        tracing::debug!(event = event_id, pending = task.status().is_pending(), "Registration modal closed");

        task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    use crate::errors::{WorkflowError, WorkflowResult};
    use crate::notify::NoticeLevel;

    #[derive(Clone)]
    struct SlowEvents {
        delay: Duration,
        outcome: Arc<WorkflowResult<String>>,
    }

    impl EventApi for SlowEvents {
        async fn register_for_event(&self, _: &str) -> WorkflowResult<String> {
            tokio::time::sleep(self.delay).await;
            (*self.outcome).clone()
        }
    }

    #[tokio::test]
    async fn test_modal_closes_before_slow_registration_finishes() {
        let notifier = Notifier::default();
        let mut notices = notifier.subscribe();
        let flow = RegistrationFlow::new(
            SlowEvents {
                delay: Duration::from_millis(300),
                outcome: Arc::new(Ok("Registered for Alumni Meet".to_string())),
            },
            notifier,
            Duration::from_millis(20),
        );

        flow.open();
        let started = Instant::now();
        let task = flow.confirm("evt-1").await;

        assert!(!flow.is_open());
        assert!(started.elapsed() < Duration::from_millis(250));
        assert!(task.status().is_pending());

        assert_eq!(
            task.wait().await,
            TaskStatus::Succeeded("Registered for Alumni Meet".to_string())
        );
        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.subject, "evt-1");
    }

    #[tokio::test]
    async fn test_failure_is_reported_after_close() {
        let notifier = Notifier::default();
        let mut notices = notifier.subscribe();
        let flow = RegistrationFlow::new(
            SlowEvents {
                delay: Duration::from_millis(50),
                outcome: Arc::new(Err(WorkflowError::validation("Event is full"))),
            },
            notifier,
            Duration::from_millis(10),
        );

        flow.open();
        let task = flow.confirm("evt-2").await;
        assert!(!flow.is_open());

        assert!(matches!(task.wait().await, TaskStatus::Failed(_)));
        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.text, "Event is full");
    }

    #[tokio::test]
    async fn test_cancelled_registration_sends_no_notice() {
        let notifier = Notifier::default();
        let mut notices = notifier.subscribe();
        let flow = RegistrationFlow::new(
            SlowEvents {
                delay: Duration::from_millis(100),
                outcome: Arc::new(Ok("Registered".to_string())),
            },
            notifier,
            Duration::from_millis(10),
        );

        let task = flow.confirm("evt-3").await;
        task.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(task.wait().await, TaskStatus::Cancelled);
        assert!(notices.try_recv().is_err());
    }
}
