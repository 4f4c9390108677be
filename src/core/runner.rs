//! # Run a single task on the looper thread.
//!
//! [`run_task`] is the per-task failure boundary: whatever the task does,
//! control returns to the consume loop.
//!
//! ```text
//! Success:  task.run() → Ok(())             → Ok(())
//! Failure:  task.run() → Err(Fail)          → Err(Fail)
//! Panic:    task.run() → unwind → caught    → Err(Panicked { info })
//! ```

use std::panic::{self, AssertUnwindSafe};

use crate::error::{TaskError, panic_info};
use crate::tasks::Task;

/// Runs `task` inline, converting a panic into [`TaskError::Panicked`].
///
/// `AssertUnwindSafe` is sound here because the task is consumed by the call:
/// nothing it owned is observed after an unwind.
pub(crate) fn run_task(task: Task) -> Result<(), TaskError> {
    match panic::catch_unwind(AssertUnwindSafe(move || task.run())) {
        Ok(res) => res,
        Err(payload) => Err(TaskError::Panicked {
            info: panic_info(payload.as_ref()),
        }),
    }
}
