//! # ObserverSet: synchronous fan-out over multiple observers
//!
//! [`ObserverSet`] hands each [`Trace`] to every observer, in registration
//! order, on the calling thread.
//!
//! ## Rules
//! - **Inline**: `emit()` returns after every observer ran.
//! - **Isolation**: a panicking observer is caught and reported with
//!   `tracing::warn!`; the remaining observers still run and the emitting
//!   thread (looper or producer) keeps going.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave observer state
//! inconsistent if it panics while holding a lock of its own.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::warn;

use super::{Observe, Trace};
use crate::error::panic_info;

/// Fan-out coordinator for looper observers.
#[derive(Default, Clone)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn Observe>>,
}

impl ObserverSet {
    /// Creates a set from the given observers.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>) -> Self {
        Self { observers }
    }

    /// Delivers `trace` to every observer.
    pub fn emit(&self, trace: &Trace) {
        for observer in &self.observers {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| observer.on_trace(trace))) {
                warn!(
                    observer = observer.name(),
                    kind = trace.kind.as_tag(),
                    info = %panic_info(payload.as_ref()),
                    "observer panicked"
                );
            }
        }
    }

    /// True if there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }
}
