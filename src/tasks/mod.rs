//! Background tasks with an observable status.
//!
//! Work that finishes after the caller has moved on (a registration confirmed after the
//! modal is gone, an upload) runs as a `BackgroundTask`. Its status can be read,
//! awaited or cancelled.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::errors::{WorkflowError, WorkflowResult};

/// Lifecycle of a background task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus<T> {
    Pending,
    Succeeded(T),
    Failed(WorkflowError),
    Cancelled,
}

impl<T> TaskStatus<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Pending)
    }
}

/// Handle to a spawned task.
#[derive(Debug)]
pub struct BackgroundTask<T> {
    id: Uuid,
    tx: Arc<watch::Sender<TaskStatus<T>>>,
    rx: watch::Receiver<TaskStatus<T>>,
    handle: JoinHandle<()>,
}

/// Move from `Pending` to `next`. Whoever settles first wins.
fn settle<T>(tx: &watch::Sender<TaskStatus<T>>, next: TaskStatus<T>) -> bool {
    tx.send_if_modified(move |status| {
        if status.is_pending() {
            *status = next;
            true
        } else {
            false
        }
    })
}

impl<T> BackgroundTask<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawn `work` on the tokio runtime.
    pub fn spawn<F>(label: impl Into<String>, work: F) -> Self
    where
        F: Future<Output = WorkflowResult<T>> + Send + 'static,
    {
        Self::spawn_then(label, work, |_| {})
    }

    /// Like `spawn`, but runs `on_settled` with the final status when the work itself
    /// settles the task. It does not run if `cancel` won first.
    pub fn spawn_then<F, C>(label: impl Into<String>, work: F, on_settled: C) -> Self
    where
        F: Future<Output = WorkflowResult<T>> + Send + 'static,
        C: FnOnce(&TaskStatus<T>) + Send + 'static,
    {
        let id = Uuid::new_v4();
        let label = label.into();
        let (tx, rx) = watch::channel(TaskStatus::Pending);
        let tx = Arc::new(tx);

        let task_tx = tx.clone();
        let handle = tokio::spawn(async move {
            let next = match work.await {
                Ok(value) => {
                    tracing::info!(task = %id, %label, "Background task succeeded");
                    TaskStatus::Succeeded(value)
                }
                Err(e) => {
                    tracing::error!(task = %id, %label, error = %e, "Background task failed");
                    TaskStatus::Failed(e)
                }
            };
            // No await between settle and the callback, so an abort cannot split them.
            if settle(&task_tx, next.clone()) {
                on_settled(&next);
            }
        });

        Self { id, tx, rx, handle }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> TaskStatus<T> {
        self.rx.borrow().clone()
    }

    /// Receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<TaskStatus<T>> {
        self.rx.clone()
    }

    /// Abort the task. Has no effect once it has settled.
    pub fn cancel(&self) {
        self.handle.abort();
        if settle(&self.tx, TaskStatus::Cancelled) {
            tracing::info!(task = %self.id, "Background task cancelled");
        }
    }

    /// Wait until the task leaves `Pending` and return its final status.
    pub async fn wait(&self) -> TaskStatus<T> {
        let mut rx = self.rx.clone();
        let status = match rx.wait_for(|status| !status.is_pending()).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        };
        status
    }
}

/// Caller side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Worker side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancelled. Pends forever if the handle is dropped first.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}
