//! # Events emitted by guarded timers, schedulers and the registry.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Timer events**: thread start, shutdown, purge, drain
//! - **Submission events**: tasks accepted, ignored after shutdown, rejected
//! - **Registry events**: scheduler creation, disposal, strategy fallback
//!
//! The [`Event`] struct carries metadata such as the timer name, task name,
//! engine identity, reason and delay.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore order across timers.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use mdns_scheduler::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_timer("mdns(eth0).timer")
//!     .with_task("responder")
//!     .with_reason("socket closed")
//!     .with_delay(Duration::from_millis(120));
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("responder"));
//! assert_eq!(ev.delay_ms, Some(120));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of scheduler events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Timer events ===
    /// Timer worker thread started (first accepted submission).
    ///
    /// Sets:
    /// - `timer`: timer name
    TimerStarted,

    /// Timer transitioned to the closed state.
    ///
    /// Sets:
    /// - `timer`: timer name
    TimerShutdown,

    /// Pending self-cancelled entries were dropped from the queue.
    ///
    /// Sets:
    /// - `timer`: timer name
    /// - `reason`: number of dropped entries
    TimerPurged,

    /// Timer handle was dropped and the worker ran its queue dry.
    ///
    /// Sets:
    /// - `timer`: timer name
    TimerDrained,

    // === Submission events ===
    /// Submission accepted and handed to the worker.
    ///
    /// Sets:
    /// - `timer`: timer name
    /// - `task`: task name
    /// - `delay_ms`: delay until the first run
    TaskScheduled,

    /// Submission arrived after shutdown and was ignored.
    ///
    /// Sets:
    /// - `timer`: timer name
    /// - `task`: task name
    SubmissionIgnored,

    /// Submission was malformed or could not be delivered and was dropped.
    ///
    /// Sets:
    /// - `timer`: timer name
    /// - `task`: task name
    /// - `reason`: error label
    SubmissionRejected,

    /// Task run is starting on the timer thread.
    ///
    /// Sets:
    /// - `timer`, `task`
    TaskStarting,

    /// Task run returned `Ok`.
    ///
    /// Sets:
    /// - `timer`, `task`
    TaskFinished,

    /// Task run returned an error.
    ///
    /// Sets:
    /// - `timer`, `task`
    /// - `reason`: error message
    TaskFailed,

    /// Task run panicked; the timer keeps running.
    ///
    /// Sets:
    /// - `timer`, `task`
    /// - `reason`: panic payload, if printable
    TaskPanicked,

    // === Registry events ===
    /// A scheduler was stored in the registry for an engine.
    ///
    /// Sets:
    /// - `engine`: engine identity
    SchedulerCreated,

    /// A registry entry was removed.
    ///
    /// Sets:
    /// - `engine`: engine identity
    SchedulerDisposed,

    /// The installed strategy produced nothing; default construction was used.
    ///
    /// Sets:
    /// - `engine`: engine identity
    /// - `reason`: `"declined"` or the panic payload
    StrategyFallback,
}

/// Scheduler event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the timer, if applicable.
    pub timer: Option<Arc<str>>,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Engine identity, if applicable.
    pub engine: Option<Arc<str>>,
    /// Human-readable reason (errors, counts, etc.).
    pub reason: Option<Arc<str>>,
    /// Delay until the first run of a submission in milliseconds (compact).
    pub delay_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            timer: None,
            task: None,
            engine: None,
            reason: None,
            delay_ms: None,
        }
    }

    /// Attaches a timer name.
    #[inline]
    pub fn with_timer(mut self, timer: impl Into<Arc<str>>) -> Self {
        self.timer = Some(timer.into());
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches an engine identity.
    #[inline]
    pub fn with_engine(mut self, engine: impl Into<Arc<str>>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a delay (stored as milliseconds, saturating).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Returns true for events that describe a task run outcome.
    #[inline]
    pub fn is_task_outcome(&self) -> bool {
        matches!(
            self.kind,
            EventKind::TaskFinished | EventKind::TaskFailed | EventKind::TaskPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::TimerStarted);
        let b = Event::new(EventKind::TimerShutdown);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_saturates() {
        let ev = Event::new(EventKind::TaskStarting).with_delay(Duration::from_secs(u64::MAX));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }

    #[test]
    fn test_task_outcome() {
        assert!(Event::new(EventKind::TaskPanicked).is_task_outcome());
        assert!(!Event::new(EventKind::SubmissionIgnored).is_task_outcome());
    }
}
