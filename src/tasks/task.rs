//! # Deferred unit of work.
//!
//! A [`Task`] wraps a one-shot closure together with a unique id and a label.
//! Tasks are created on producer threads (by the looper's listener or by
//! [`Looper::post`](crate::Looper::post)), owned by the
//! [`TaskQueue`](super::TaskQueue) until dequeued, and consumed by running
//! them on the looper thread.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::error::TaskError;

/// Global counter for task ids.
static TASK_SEQ: AtomicU64 = AtomicU64::new(1);

/// Boxed one-shot job executed on the looper thread.
pub type TaskJob = Box<dyn FnOnce() -> Result<(), TaskError> + Send + 'static>;

/// One-shot unit of work.
pub struct Task {
    id: u64,
    label: Arc<str>,
    job: TaskJob,
}

impl Task {
    /// Creates a task from a closure.
    pub fn new<F>(label: impl Into<Arc<str>>, job: F) -> Self
    where
        F: FnOnce() -> Result<(), TaskError> + Send + 'static,
    {
        Self {
            id: TASK_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            label: label.into(),
            job: Box::new(job),
        }
    }

    /// Unique task id (monotonic in creation order).
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Label used in logs and traces.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub(crate) fn label_arc(&self) -> Arc<str> {
        Arc::clone(&self.label)
    }

    /// Consumes the task and runs its job on the current thread.
    ///
    /// Panics inside the job are not caught here; the looper catches them at
    /// its task boundary.
    pub fn run(self) -> Result<(), TaskError> {
        (self.job)()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
