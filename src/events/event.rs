//! # Events published by producers.
//!
//! An [`Event`] is an immutable value with a descriptive label (usually the
//! identity of the producer that created it). Events are published on the
//! [`EventBus`](super::EventBus), handed to every listener by value and then
//! discarded.
//!
//! ## Ordering
//! Each event carries a globally unique sequence number (`seq`) that increases
//! monotonically in creation order.
//!
//! ## Example
//! ```rust
//! use looper::Event;
//!
//! let a = Event::new("Thread #1");
//! let b = Event::new("Thread #2");
//!
//! assert_eq!(a.label(), "Thread #1");
//! assert!(b.seq > a.seq);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Event with a descriptive label.
///
/// Cloning is cheap: the label is shared behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock creation timestamp.
    pub at: SystemTime,
    label: Arc<str>,
}

impl Event {
    /// Creates a new event with the current timestamp and next sequence number.
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            label: label.into(),
        }
    }

    /// Descriptive label (originating producer identity).
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Shared handle to the label.
    #[inline]
    pub fn label_arc(&self) -> Arc<str> {
        Arc::clone(&self.label)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event(#{} {})", self.seq, self.label)
    }
}
