//! # LogWriter: looper transition printer
//!
//! An observer that renders every [`Trace`] as one `tracing` record.
//! Hand-off and lifecycle transitions log at `info`, consume-loop
//! bookkeeping at `debug`, failed and discarded tasks at `warn`.
//!
//! ## Example output
//! ```text
//! INFO producer-1 [received] event="Thread #1"
//! INFO producer-1 [enqueued] task=3 event="Thread #1"
//! DEBUG producer-1 [notify] task=3
//! DEBUG looper [woken] pending=1
//! INFO looper [running] task=3 event="Thread #1" pending=0
//! INFO looper [completed] task=3
//! DEBUG looper [queue-empty]
//! DEBUG looper [waiting]
//! ```

use tracing::{debug, info, warn};

use super::{Observe, Trace, TraceKind};

/// Event writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Observe for LogWriter {
    fn on_trace(&self, t: &Trace) {
        let thread = &*t.thread;
        let tag = t.kind.as_tag();
        let event = t.event.as_deref().unwrap_or("-");
        match t.kind {
            TraceKind::Started => {
                info!("{thread} [{tag}] looper entered its loop");
            }
            TraceKind::Stopped => {
                info!("{thread} [{tag}] discarded={:?}", t.pending.unwrap_or(0));
            }
            TraceKind::EventReceived => {
                info!("{thread} [{tag}] event={event:?}");
            }
            TraceKind::TaskEnqueued => {
                info!("{thread} [{tag}] task={:?} event={event:?}", t.task);
            }
            TraceKind::TaskDiscarded => {
                warn!(
                    "{thread} [{tag}] task={:?} event={event:?} reason={:?}",
                    t.task,
                    t.reason.as_deref().unwrap_or("unknown")
                );
            }
            TraceKind::Notified => {
                debug!("{thread} [{tag}] task={:?}", t.task);
            }
            TraceKind::QueueEmpty | TraceKind::Waiting => {
                debug!("{thread} [{tag}]");
            }
            TraceKind::Woken => {
                debug!("{thread} [{tag}] pending={:?}", t.pending);
            }
            TraceKind::TaskStarted => {
                info!(
                    "{thread} [{tag}] task={:?} event={event:?} pending={:?}",
                    t.task, t.pending
                );
            }
            TraceKind::TaskCompleted => {
                info!("{thread} [{tag}] task={:?}", t.task);
            }
            TraceKind::TaskFailed => {
                warn!(
                    "{thread} [{tag}] task={:?} event={event:?} err={:?}",
                    t.task,
                    t.reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
