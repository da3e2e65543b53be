//! # Task abstractions and schedules.
//!
//! This module provides the task-related types:
//! - [`TimerTask`] - trait for async units executed by a guarded timer
//! - [`TaskFn`] - function-based task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn TimerTask>`)
//! - [`Schedule`], [`Start`] - submission shapes (one-shot, fixed-delay, fixed-rate)
//! - [`PhaseTask`], [`PhaseRef`], [`ScheduledPhase`] - protocol phases handed to a timer

mod phase;
mod schedule;
mod task;
mod task_fn;

pub use phase::{PhaseRef, PhaseTask, ScheduledPhase};
pub use schedule::{Schedule, Start};
pub(crate) use schedule::saturating_add;
pub use task::{TaskRef, TimerTask};
pub use task_fn::TaskFn;
