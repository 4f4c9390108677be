//! Synthetic event producers feeding the [`EventBus`](crate::EventBus).
//!
//! Producers are an external collaborator of the looper: they only call
//! [`EventBus::publish`](crate::EventBus::publish).

mod pool;

pub use pool::ProducerPool;
