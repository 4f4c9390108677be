//! # Event bus: synchronous dispatch to registered listeners.
//!
//! [`EventBus`] is the single well-known dispatch point connecting producers
//! to listeners. It is constructed explicitly and shared through an `Arc`;
//! there is no process-wide global.
//!
//! ## Architecture
//! ```text
//! Publishers (many threads):           Listeners (registration order):
//!   producer-1 ──┐
//!   producer-2 ──┼──► publish(ev) ──► listener 1 ──► listener 2 ──► ...
//!   producer-N ──┘   (caller's thread, synchronous)
//! ```
//!
//! ## Rules
//! - **Synchronous**: `publish()` runs every listener on the caller's thread
//!   before returning; a blocking listener blocks the publisher.
//! - **Ordered**: listeners are invoked in registration order.
//! - **No isolation**: the first listener error stops delivery and is returned
//!   to the publisher; a listener panic unwinds into the publisher.
//! - **Append-only**: listeners are never removed. Register them before the
//!   producers that should reach them start publishing.

use std::sync::{PoisonError, RwLock};

use tracing::debug;

use super::{Event, ListenerRef};
use crate::error::ListenerError;

/// Registry of listeners plus synchronous dispatch.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<Vec<ListenerRef>>,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener to the registry.
    pub fn register_listener(&self, listener: ListenerRef) {
        debug!(listener = listener.name(), "listener registered");
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Delivers `event` to every listener, in registration order, on the caller's thread.
    ///
    /// Each listener receives its own clone of the event. The registry is
    /// snapshotted first so no lock is held while listeners run.
    pub fn publish(&self, event: Event) -> Result<(), ListenerError> {
        let listeners = self.snapshot();
        debug!(
            event = event.label(),
            seq = event.seq,
            listeners = listeners.len(),
            "sending event"
        );
        for listener in &listeners {
            listener.on_event(event.clone())?;
        }
        Ok(())
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<ListenerRef> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
