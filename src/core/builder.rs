use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::looper::{EventHandler, Looper};
use crate::error::TaskError;
use crate::events::Event;
use crate::observers::{Observe, ObserverSet};

/// Default name of the looper thread.
pub const DEFAULT_LOOPER_NAME: &str = "looper";

/// Builder for constructing a [`Looper`].
pub struct LooperBuilder {
    name: Arc<str>,
    observers: Vec<Arc<dyn Observe>>,
    handler: Option<EventHandler>,
}

impl LooperBuilder {
    /// Creates a builder with the default name, no observers and the logging handler.
    pub fn new() -> Self {
        Self {
            name: DEFAULT_LOOPER_NAME.into(),
            observers: Vec::new(),
            handler: None,
        }
    }

    /// Sets the looper name, also used as its thread name.
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds one observer.
    pub fn with_observer(mut self, observer: Arc<dyn Observe>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Replaces the observers.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Sets the work performed for each event received from the bus.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Event) -> Result<(), TaskError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Builds the looper. It does nothing until attached and run.
    pub fn build(self) -> Arc<Looper> {
        let handler: EventHandler = match self.handler {
            Some(handler) => handler,
            None => Arc::new(log_event),
        };
        Arc::new(Looper::new_internal(
            self.name,
            ObserverSet::new(self.observers),
            handler,
            CancellationToken::new(),
        ))
    }
}

impl Default for LooperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn log_event(event: &Event) -> Result<(), TaskError> {
    info!(event = event.label(), seq = event.seq, "doing some work with event");
    Ok(())
}
