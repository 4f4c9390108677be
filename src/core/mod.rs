//! Runtime core: the looper and its lifecycle.
//!
//! Public API from this module is [`Looper`] (with [`LooperBuilder`],
//! [`LooperHandle`], [`LooperState`], [`LooperStats`]) and the signal helper
//! used by the binary.
//!
//! Internal modules:
//! - `looper`: consume loop, bus listener, stop;
//! - `runner`: executes one task behind a panic boundary;
//! - `builder`: assembles a looper with observers and handler;
//! - `handle`: dedicated-thread handle (stop/join);
//! - [`shutdown`]: cross-platform termination signal handling.

mod builder;
mod handle;
mod looper;
mod runner;
pub mod shutdown;

pub use builder::{DEFAULT_LOOPER_NAME, LooperBuilder};
pub use handle::LooperHandle;
pub use looper::{EventHandler, Looper, LooperState, LooperStats};
