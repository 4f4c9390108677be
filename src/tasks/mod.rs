//! Tasks and the blocking queue that hands them to the looper thread.
//!
//! - [`Task`] one-shot closure with id and label
//! - [`TaskQueue`] mutex + condvar FIFO, see [`Wake`]

mod queue;
mod task;

pub use queue::{TaskQueue, Wake};
pub use task::{Task, TaskJob};
