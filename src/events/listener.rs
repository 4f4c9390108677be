//! # Listener contract
//!
//! [`Listener`] is the single capability the [`EventBus`](super::EventBus)
//! needs from a registered callback: handle one event. It is invoked
//! synchronously, on the publisher's thread, so implementations should return
//! quickly (append/signal, not heavy work).
//!
//! [`ListenerFn`] adapts a closure.
//!
//! ## Example
//! ```rust
//! use looper::{Event, ListenerError, ListenerFn, ListenerRef};
//!
//! let l: ListenerRef = ListenerFn::arc("printer", |ev: Event| {
//!     println!("got {ev}");
//!     Ok::<_, ListenerError>(())
//! });
//! assert_eq!(l.name(), "printer");
//! ```

use std::sync::Arc;

use crate::error::ListenerError;
use crate::events::Event;

/// Shared handle to a listener.
pub type ListenerRef = Arc<dyn Listener>;

/// Callback invoked for every published event.
pub trait Listener: Send + Sync + 'static {
    /// Handles one event; the event is passed by value.
    ///
    /// Returning `Err` stops delivery of this event and propagates to the publisher.
    fn on_event(&self, event: Event) -> Result<(), ListenerError>;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Function-backed listener.
#[derive(Debug)]
pub struct ListenerFn<F> {
    name: &'static str,
    f: F,
}

impl<F> ListenerFn<F>
where
    F: Fn(Event) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    /// Creates a new function-backed listener.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Listener for ListenerFn<F>
where
    F: Fn(Event) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    fn on_event(&self, event: Event) -> Result<(), ListenerError> {
        (self.f)(event)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
