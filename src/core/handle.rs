use std::sync::Arc;
use std::thread::JoinHandle;

use super::looper::Looper;
use crate::error::RuntimeError;

/// Handle to a looper running on its dedicated thread.
///
/// Dropping the handle detaches the thread; the looper keeps running until
/// [`Looper::stop`] is called through another reference.
pub struct LooperHandle {
    looper: Arc<Looper>,
    thread: JoinHandle<()>,
}

impl LooperHandle {
    pub(super) fn new(looper: Arc<Looper>, thread: JoinHandle<()>) -> Self {
        Self { looper, thread }
    }

    /// The looper driven by this thread.
    pub fn looper(&self) -> &Arc<Looper> {
        &self.looper
    }

    /// Requests a cooperative stop without waiting.
    pub fn stop(&self) {
        self.looper.stop();
    }

    /// Waits for the looper thread to exit.
    pub fn join(self) -> Result<(), RuntimeError> {
        self.thread
            .join()
            .map_err(|_| RuntimeError::ThreadPanicked {
                thread: self.looper.name().to_string(),
            })
    }

    /// Stops the looper and waits for its thread.
    pub fn shutdown(self) -> Result<(), RuntimeError> {
        self.stop();
        self.join()
    }
}
