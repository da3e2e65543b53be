//! # Timer task abstraction.
//!
//! This module defines the [`TimerTask`] trait, the unit of work a
//! [`GuardedTimer`](crate::GuardedTimer) executes. The common handle type is
//! [`TaskRef`], an `Arc<dyn TimerTask>` suitable for sharing across threads.
//!
//! A task receives a [`CancellationToken`] scoped to its submission:
//! - the task may cancel it to stop its own repetition;
//! - the timer cancels it on shutdown, so long runs can exit early.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Shared handle to a timer task.
pub type TaskRef = Arc<dyn TimerTask>;

/// # Asynchronous unit executed by a guarded timer.
///
/// A `TimerTask` has a stable [`name`](TimerTask::name) and an async
/// [`run`](TimerTask::run) method. Runs on one timer never overlap: the timer
/// awaits each run before starting the next due entry.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use mdns_scheduler::{TimerTask, TaskError};
///
/// struct Reaper;
///
/// #[async_trait]
/// impl TimerTask for Reaper {
///     fn name(&self) -> &str { "reaper" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
///         if ctx.is_cancelled() {
///             return Err(TaskError::Canceled);
///         }
///         // drop expired records...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait TimerTask: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Executes one run of the task.
    ///
    /// Cancelling `ctx` from inside the run ends a repeating schedule after
    /// this run returns.
    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError>;
}
