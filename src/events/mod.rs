//! Producer events: data model, listener contract and synchronous bus.
//!
//! ## Contents
//! - [`Event`] immutable labelled value created by a producer
//! - [`Listener`], [`ListenerFn`], [`ListenerRef`] callback contract
//! - [`EventBus`] registry + synchronous dispatch
//!
//! ## Quick reference
//! - **Publishers**: [`ProducerPool`](crate::ProducerPool) threads, or any caller.
//! - **Listeners**: the [`Looper`](crate::Looper) (translates events into tasks),
//!   or user code.

mod bus;
mod event;
mod listener;

pub use bus::EventBus;
pub use event::Event;
pub use listener::{Listener, ListenerFn, ListenerRef};
