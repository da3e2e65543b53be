//! # Protocol phase tasks.
//!
//! A [`PhaseTask`] is what the scheduler builds for each protocol phase
//! (probe, announce, renew, cancel, reap, resolve, respond). Phases are owned
//! by the engine's collaborators; the scheduler only hands each one the timer
//! it belongs on through [`PhaseTask::start`].
//!
//! [`ScheduledPhase`] is the common case: one [`TaskRef`] submitted with one
//! [`Schedule`].

use std::sync::Arc;

use crate::tasks::{Schedule, TaskRef};
use crate::timer::TimerRef;

/// Shared handle to a phase task.
pub type PhaseRef = Arc<dyn PhaseTask>;

/// A protocol phase that begins execution on a given timer.
///
/// Implementations typically submit one or more [`TimerTask`](crate::TimerTask)s
/// and may keep a clone of `timer` to reschedule themselves later. Submissions
/// to a timer that has shut down are silently ignored, so a phase must never
/// assume its continuation was accepted.
pub trait PhaseTask: Send + Sync + 'static {
    /// Phase name used in logs.
    fn name(&self) -> &str;

    /// Begins execution on `timer`.
    fn start(self: Arc<Self>, timer: &TimerRef);
}

/// A phase made of a single task and its schedule.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use mdns_scheduler::{PhaseRef, Schedule, ScheduledPhase, TaskError, TaskFn};
///
/// let reaper: PhaseRef = ScheduledPhase::arc(
///     TaskFn::arc("reaper", |_ctx: CancellationToken| async { Ok::<_, TaskError>(()) }),
///     Schedule::fixed_delay(Duration::from_secs(10), Duration::from_secs(10)),
/// );
/// assert_eq!(reaper.name(), "reaper");
/// ```
#[derive(Clone)]
pub struct ScheduledPhase {
    task: TaskRef,
    schedule: Schedule,
}

impl ScheduledPhase {
    /// Creates a phase that submits `task` with `schedule`.
    pub fn new(task: TaskRef, schedule: Schedule) -> Self {
        Self { task, schedule }
    }

    /// Creates the phase and returns it as a shared handle.
    pub fn arc(task: TaskRef, schedule: Schedule) -> Arc<Self> {
        Arc::new(Self::new(task, schedule))
    }

    /// Returns reference to the task.
    pub fn task(&self) -> &TaskRef {
        &self.task
    }

    /// Returns the schedule.
    pub fn schedule(&self) -> Schedule {
        self.schedule
    }
}

impl PhaseTask for ScheduledPhase {
    fn name(&self) -> &str {
        self.task.name()
    }

    fn start(self: Arc<Self>, timer: &TimerRef) {
        timer.submit(Arc::clone(&self.task), self.schedule);
    }
}
