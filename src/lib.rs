//! # looper
//!
//! **looper** is a single-threaded task loop fed by many producer threads.
//!
//! Producers publish [`Event`]s on an explicitly constructed [`EventBus`].
//! The bus calls every registered [`Listener`] synchronously, on the
//! publisher's thread. The [`Looper`]'s listener wraps each event in a
//! [`Task`] and hands it to a blocking [`TaskQueue`]; the looper's own
//! thread, parked on the queue's condition variable while idle, wakes up,
//! dequeues and runs the task.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  producer-1  │   │  producer-2  │   │  producer-N  │
//!     │ (OS thread)  │   │ (OS thread)  │   │ (OS thread)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ publish(Event)   │                  │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventBus (registry, synchronous dispatch on the caller's thread) │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │     LooperListener     │  (still on producer thread)
//!                       │  Event ─► Task         │
//!                       └───────────┬────────────┘
//!                                   │ enqueue + notify
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │ TaskQueue              │
//!                       │ Mutex<VecDeque>+Condvar│
//!                       └───────────┬────────────┘
//!                                   │ wait_for_work / dequeue_front
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │ Looper thread          │──► ObserverSet ──► LogWriter, ...
//!                       │ run tasks one by one   │      (Trace records)
//!                       └────────────────────────┘
//! ```
//!
//! ## Features
//! | Area             | Description                                                | Key types                                 |
//! |------------------|------------------------------------------------------------|-------------------------------------------|
//! | **Looper**       | Single consumer loop, FIFO, panic-isolated tasks, stop     | [`Looper`], [`LooperHandle`]              |
//! | **Queue**        | Blocking FIFO with wait/notify, no busy spinning           | [`TaskQueue`], [`Wake`]                   |
//! | **Bus**          | Synchronous listener dispatch, errors propagate            | [`EventBus`], [`Listener`], [`ListenerFn`]|
//! | **Observers**    | Transition records for logging and tests                   | [`Observe`], [`Trace`], [`LogWriter`]     |
//! | **Producers**    | Named threads publishing at random intervals               | [`ProducerPool`]                          |
//! | **Errors**       | Typed errors for tasks, listeners, runtime                 | [`TaskError`], [`ListenerError`]          |
//! | **Configuration**| Producer count and delay range                             | [`Config`]                                |
//!
//! ## Example
//! ```rust
//! use std::sync::mpsc;
//! use std::time::Duration;
//! use looper::{Event, EventBus, Looper};
//!
//! let (tx, rx) = mpsc::channel();
//! let bus = EventBus::new();
//! let looper = Looper::builder()
//!     .with_handler(move |ev: &Event| {
//!         let _ = tx.send(ev.label().to_string());
//!         Ok(())
//!     })
//!     .build();
//!
//! // Register before anything publishes, then run on a dedicated thread.
//! let handle = looper.spawn(&bus)?;
//!
//! bus.publish(Event::new("Thread #1"))?;
//! assert_eq!(rx.recv_timeout(Duration::from_secs(5))?, "Thread #1");
//!
//! handle.shutdown()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod config;
mod core;
mod error;
mod events;
mod observers;
mod producers;
mod tasks;

// ---- Public re-exports ----

pub use config::Config;
pub use crate::core::shutdown;
pub use crate::core::{
    DEFAULT_LOOPER_NAME, EventHandler, Looper, LooperBuilder, LooperHandle, LooperState,
    LooperStats,
};
pub use error::{ConfigError, ListenerError, RuntimeError, TaskError};
pub use events::{Event, EventBus, Listener, ListenerFn, ListenerRef};
pub use observers::{LogWriter, Observe, ObserverSet, Trace, TraceKind};
pub use producers::ProducerPool;
pub use tasks::{Task, TaskJob, TaskQueue, Wake};
