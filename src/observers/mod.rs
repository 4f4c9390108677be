//! # Looper observers.
//!
//! The looper reports each state transition as a [`Trace`]. Observers
//! implementing [`Observe`] receive them through an [`ObserverSet`].
//!
//! ## Contents
//! - [`Trace`], [`TraceKind`] transition record and classification
//! - [`Observe`] observer contract
//! - [`ObserverSet`] synchronous, panic-isolated fan-out
//! - [`LogWriter`] renders traces through `tracing`

mod log;
mod observer;
mod set;
mod trace;

pub use log::LogWriter;
pub use observer::Observe;
pub use set::ObserverSet;
pub use trace::{Trace, TraceKind};
