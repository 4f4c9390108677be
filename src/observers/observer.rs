//! # Observe: looper transition handlers
//!
//! The [`Observe`] trait is the extension point for watching a looper.
//! Every [`Trace`] the looper emits is handed to each observer synchronously,
//! on the thread that produced the transition (a producer thread for
//! hand-off traces, the looper thread for consume-loop traces).
//!
//! Implementing your own observer allows you to plug in:
//! - metrics counters;
//! - test recorders asserting on transition sequences;
//! - structured logging.
//!
//! ```text
//!   Looper ── emit(Trace) ──► ObserverSet ──► Observe::on_trace(&Trace)
//!                                  │
//!              ┌───────────────────┼──────────────────┐
//!              ▼                   ▼                  ▼
//!          LogWriter          Recorder          CustomObserver
//!          (tracing)          (tests)           (user logic)
//! ```
//!
//! # Example: custom observer
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use looper::{Observe, Trace, TraceKind};
//!
//! #[derive(Default)]
//! struct FailureCounter(AtomicUsize);
//!
//! impl Observe for FailureCounter {
//!     fn on_trace(&self, trace: &Trace) {
//!         if trace.kind == TraceKind::TaskFailed {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "failure-counter"
//!     }
//! }
//! ```

use super::Trace;

/// Receiver of looper transitions.
///
/// Called inline on the emitting thread, outside the queue lock.
/// Implementations must be cheap and must not block.
pub trait Observe: Send + Sync + 'static {
    /// Called for every emitted [`Trace`].
    fn on_trace(&self, trace: &Trace);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
