//! # Looper transition records.
//!
//! The [`TraceKind`] enum classifies the transitions a [`Looper`](crate::Looper)
//! goes through. A [`Trace`] carries the kind plus metadata: the thread that
//! emitted it, the task id, the event label, the queue length and a reason.
//!
//! Traces are the observable contract of the looper: tests assert on the
//! **sequence of kinds** rather than on thread identities.
//!
//! ## Typical sequence
//! ```text
//! looper thread:    Started → QueueEmpty → Waiting
//! producer thread:                                 EventReceived → TaskEnqueued → Notified
//! looper thread:                                                                         Woken → TaskStarted → TaskCompleted → QueueEmpty → Waiting
//! ```
//!
//! ## Example
//! ```rust
//! use looper::{Trace, TraceKind};
//!
//! let t = Trace::new(TraceKind::TaskFailed)
//!     .with_task(7)
//!     .with_reason("boom");
//!
//! assert_eq!(t.kind, TraceKind::TaskFailed);
//! assert_eq!(t.task, Some(7));
//! assert_eq!(t.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::thread;
use std::time::SystemTime;

/// Global sequence counter for trace ordering.
static TRACE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of looper transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceKind {
    // === Lifecycle ===
    /// Looper thread entered its loop (state: Idle).
    ///
    /// Sets: `thread`
    Started,

    /// Looper left its loop after a stop request (state: Stopped).
    ///
    /// Sets:
    /// - `thread`
    /// - `pending`: number of tasks discarded on stop
    Stopped,

    // === Hand-off (producer thread) ===
    /// Listener received an event from the bus.
    ///
    /// Sets:
    /// - `thread`: publishing thread
    /// - `event`: event label
    EventReceived,

    /// Task appended to the queue.
    ///
    /// Sets:
    /// - `thread`: enqueuing thread
    /// - `task`: task id
    /// - `event`: task label
    TaskEnqueued,

    /// Queue signalled after an enqueue.
    ///
    /// Sets: `thread`, `task`
    Notified,

    /// Task rejected because the looper was stopped; it never runs.
    ///
    /// Sets:
    /// - `thread`: enqueuing thread
    /// - `task`: task id
    /// - `event`: task label
    /// - `reason`: why it was dropped
    TaskDiscarded,

    // === Consume loop (looper thread) ===
    /// Queue observed empty; the looper is about to sleep.
    ///
    /// Sets: `thread`
    QueueEmpty,

    /// Looper is blocking in `wait_for_work` (state: Idle).
    ///
    /// Sets: `thread`
    Waiting,

    /// Looper returned from `wait_for_work`.
    ///
    /// Sets:
    /// - `thread`
    /// - `pending`: queue length on wake
    Woken,

    /// Task dequeued and about to run (state: Running).
    ///
    /// Sets:
    /// - `thread`
    /// - `task`: task id
    /// - `event`: task label
    /// - `pending`: tasks still queued
    TaskStarted,

    /// Task finished successfully.
    ///
    /// Sets: `thread`, `task`, `event`
    TaskCompleted,

    /// Task returned an error or panicked; the loop continues.
    ///
    /// Sets:
    /// - `thread`, `task`, `event`
    /// - `reason`: error message
    TaskFailed,
}

impl TraceKind {
    /// Short stable tag used by [`LogWriter`](crate::LogWriter).
    pub fn as_tag(&self) -> &'static str {
        match self {
            TraceKind::Started => "started",
            TraceKind::Stopped => "stopped",
            TraceKind::EventReceived => "received",
            TraceKind::TaskEnqueued => "enqueued",
            TraceKind::Notified => "notify",
            TraceKind::TaskDiscarded => "discarded",
            TraceKind::QueueEmpty => "queue-empty",
            TraceKind::Waiting => "waiting",
            TraceKind::Woken => "woken",
            TraceKind::TaskStarted => "running",
            TraceKind::TaskCompleted => "completed",
            TraceKind::TaskFailed => "failed",
        }
    }
}

/// One looper transition with optional metadata.
#[derive(Clone, Debug)]
pub struct Trace {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Transition classification.
    pub kind: TraceKind,
    /// Name of the emitting thread (`"<unnamed>"` if it has none).
    pub thread: Arc<str>,
    /// Task id, if applicable.
    pub task: Option<u64>,
    /// Event or task label, if applicable.
    pub event: Option<Arc<str>>,
    /// Queue length, if applicable.
    pub pending: Option<usize>,
    /// Human-readable reason (errors).
    pub reason: Option<Arc<str>>,
}

impl Trace {
    /// Creates a trace of the given kind, stamped with the current thread, time and next sequence number.
    pub fn new(kind: TraceKind) -> Self {
        let thread: Arc<str> = thread::current().name().unwrap_or("<unnamed>").into();
        Self {
            seq: TRACE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            thread,
            task: None,
            event: None,
            pending: None,
            reason: None,
        }
    }

    /// Attaches a task id.
    #[inline]
    pub fn with_task(mut self, id: u64) -> Self {
        self.task = Some(id);
        self
    }

    /// Attaches an event or task label.
    #[inline]
    pub fn with_event(mut self, label: impl Into<Arc<str>>) -> Self {
        self.event = Some(label.into());
        self
    }

    /// Attaches a queue length.
    #[inline]
    pub fn with_pending(mut self, n: usize) -> Self {
        self.pending = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
