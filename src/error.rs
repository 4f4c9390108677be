//! Error types used by the looper runtime, its listeners and its tasks.
//!
//! - [`TaskError`]: a task failed on the looper thread (recovered locally).
//! - [`ListenerError`]: a bus listener rejected an event (propagates to the publisher).
//! - [`ConfigError`]: invalid [`Config`](crate::Config).
//! - [`RuntimeError`]: failures of the runtime itself (thread spawn/join, double start).
//!
//! Task and listener errors provide `as_label`/`as_message` helpers for logs.

use thiserror::Error;

/// # Errors produced by task execution.
///
/// A task failure never stops the looper: it is caught at the task boundary,
/// logged and counted, and the loop continues with the next task.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task returned an error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task panicked; the payload was caught on the looper thread.
    #[error("task panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use looper::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

/// # Errors produced by bus listeners.
///
/// The bus does not isolate listeners: the first error stops delivery of the
/// current event and is returned from [`EventBus::publish`](crate::EventBus::publish).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// Listener refused or failed to handle the event.
    #[error("listener '{listener}' failed: {reason}")]
    Failed {
        /// Name of the failing listener.
        listener: &'static str,
        /// Failure description.
        reason: String,
    },
}

impl ListenerError {
    /// Shorthand for [`ListenerError::Failed`].
    pub fn failed(listener: &'static str, reason: impl Into<String>) -> Self {
        ListenerError::Failed {
            listener,
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Failed { .. } => "listener_failed",
        }
    }
}

/// # Invalid configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// At least one producer is required.
    #[error("producer_count must be at least 1")]
    NoProducers,

    /// The producer delay range `[min, max)` contains no value.
    #[error("empty delay range: min_delay_ms={min_ms} must be below max_delay_ms={max_ms}")]
    EmptyDelayRange {
        /// Inclusive lower bound.
        min_ms: u64,
        /// Exclusive upper bound.
        max_ms: u64,
    },
}

/// # Errors produced by the runtime itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The OS refused to start a thread.
    #[error("failed to spawn thread '{thread}': {source}")]
    Spawn {
        /// Name of the thread that could not be started.
        thread: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A runtime thread terminated by panicking.
    #[error("thread '{thread}' panicked")]
    ThreadPanicked {
        /// Name of the panicked thread.
        thread: String,
    },

    /// A producer stopped because a listener rejected its event.
    #[error("producer '{thread}' stopped: {source}")]
    ProducerFailed {
        /// Name of the producer thread.
        thread: String,
        /// Error returned by the bus.
        #[source]
        source: ListenerError,
    },

    /// The looper was already started; it has exactly one consumer thread.
    #[error("looper '{looper}' is already started")]
    AlreadyStarted {
        /// Name of the looper.
        looper: String,
    },

    /// Configuration rejected before starting.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Spawn { .. } => "runtime_spawn_failed",
            RuntimeError::ThreadPanicked { .. } => "runtime_thread_panicked",
            RuntimeError::ProducerFailed { .. } => "runtime_producer_failed",
            RuntimeError::AlreadyStarted { .. } => "runtime_already_started",
            RuntimeError::Config(_) => "runtime_invalid_config",
        }
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_info(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
