//! # Blocking FIFO task queue.
//!
//! [`TaskQueue`] is the only shared mutable resource between producers and the
//! looper: producers append, the looper thread removes from the head.
//!
//! ## Synchronization
//! ```text
//!   Mutex<State { tasks: VecDeque<Task>, closed: bool }>  +  Condvar
//!
//!   enqueue        lock → push_back → unlock → notify_one   (false if closed)
//!   dequeue_front  lock → pop_front → unlock
//!   wait_for_work  lock → wait while (empty && !closed) → unlock
//!   close          lock → closed = true, drop tasks → unlock → notify_all
//! ```
//!
//! All state lives under one mutex, so a notification can never fall between
//! the waiter's emptiness check and its wait (no lost wakeup). Critical
//! sections only append, check or pop; tasks never run under the lock.
//!
//! Signalling is unconditional: every `enqueue` notifies, not only the
//! empty → non-empty transition.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::Task;

/// Why [`TaskQueue::wait_for_work`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The queue holds at least one task.
    Work,
    /// The queue was closed; no further work will be accepted.
    Closed,
}

#[derive(Default)]
struct State {
    tasks: VecDeque<Task>,
    closed: bool,
    discarded: usize,
}

/// Thread-safe FIFO with wait/notify coordination.
#[derive(Default)]
pub struct TaskQueue {
    state: Mutex<State>,
    available: Condvar,
}

impl TaskQueue {
    /// Creates an empty, open queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task to the tail and wakes a waiter.
    ///
    /// Returns `false` if the queue is closed; the task is then dropped.
    pub fn enqueue(&self, task: Task) -> bool {
        {
            let mut state = self.lock();
            if state.closed {
                debug!(task = task.id(), label = task.label(), "queue closed, task discarded");
                return false;
            }
            state.tasks.push_back(task);
        }
        self.available.notify_one();
        true
    }

    /// Removes and returns the head task, or `None` if the queue is empty.
    pub fn dequeue_front(&self) -> Option<Task> {
        self.lock().tasks.pop_front()
    }

    /// Blocks until the queue is non-empty or closed.
    ///
    /// Spurious condvar wakeups are absorbed here; the caller still treats an
    /// empty [`dequeue_front`](Self::dequeue_front) as a benign race and re-checks.
    pub fn wait_for_work(&self) -> Wake {
        let guard = self.lock();
        let state = self
            .available
            .wait_while(guard, |s| s.tasks.is_empty() && !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        if state.tasks.is_empty() {
            Wake::Closed
        } else {
            Wake::Work
        }
    }

    /// Closes the queue, drops pending tasks and wakes every waiter.
    ///
    /// Returns the number of tasks that were discarded.
    pub fn close(&self) -> usize {
        let discarded = {
            let mut state = self.lock();
            state.closed = true;
            let n = state.tasks.len();
            state.tasks.clear();
            state.discarded += n;
            n
        };
        self.available.notify_all();
        discarded
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    /// True if no task is pending.
    pub fn is_empty(&self) -> bool {
        self.lock().tasks.is_empty()
    }

    /// Total number of tasks dropped by [`close`](Self::close).
    ///
    /// Updated under the lock before waiters are woken, so a woken waiter
    /// observes the final count.
    pub fn discarded(&self) -> usize {
        self.lock().discarded
    }

    /// True once [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    // Tasks never run under the lock, so a poisoned mutex still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
