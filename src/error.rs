//! Error types used by the scheduler core and by timer tasks.
//!
//! This module defines two enums:
//!
//! - [`TaskError`]: errors returned by individual timer task executions.
//! - [`TimerError`]: failures inside a guarded timer itself.
//!
//! Neither type crosses the scheduler's public boundary as a `Result`: start,
//! cancel and purge operations are infallible. `TaskError` is how a task tells
//! its timer whether to keep repeating; `TimerError` is logged and published on
//! the event bus. Both provide `as_label` for logs/metrics.

use thiserror::Error;

/// # Errors produced by timer task execution.
///
/// A repeating task that returns [`TaskError::Fail`] keeps its schedule;
/// [`TaskError::Fatal`] and [`TaskError::Canceled`] end it.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Non-recoverable error; the task will not run again.
    #[error("fatal error (no repeat): {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// Execution failed but the next scheduled run may succeed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task observed cancellation of its token and stopped.
    #[error("context cancelled")]
    Canceled,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use mdns_scheduler::TaskError;
    ///
    /// let err = TaskError::Fail { error: "socket closed".into() };
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fatal { .. } => "task_fatal",
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fatal { error } => format!("fatal: {error}"),
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "context cancelled".to_string(),
        }
    }

    /// Indicates whether a repeating schedule should keep going after this error.
    ///
    /// Returns `true` only for [`TaskError::Fail`].
    ///
    /// # Example
    /// ```
    /// use mdns_scheduler::TaskError;
    ///
    /// assert!(TaskError::Fail { error: "boom".into() }.is_retryable());
    /// assert!(!TaskError::Fatal { error: "nope".into() }.is_retryable());
    /// assert!(!TaskError::Canceled.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, TaskError::Fail { .. })
    }
}

/// # Failures inside a guarded timer.
///
/// These never reach callers of the scheduling API; the timer logs them and
/// drops the affected submission.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TimerError {
    /// The dedicated timer thread could not be spawned.
    #[error("failed to spawn timer thread {name}: {source}")]
    Spawn {
        /// Thread name that was requested.
        name: String,
        /// OS error from the thread builder.
        #[source]
        source: std::io::Error,
    },

    /// The per-thread runtime could not be built.
    #[error("failed to build runtime for timer {name}: {source}")]
    Runtime {
        /// Timer name.
        name: String,
        /// OS error from the runtime builder.
        #[source]
        source: std::io::Error,
    },

    /// A repeating schedule was submitted with a zero period.
    #[error("repeating schedule for task {task} has a zero period")]
    ZeroPeriod {
        /// Name of the rejected task.
        task: String,
    },
}

impl TimerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use mdns_scheduler::TimerError;
    ///
    /// let err = TimerError::ZeroPeriod { task: "announcer".into() };
    /// assert_eq!(err.as_label(), "timer_zero_period");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TimerError::Spawn { .. } => "timer_spawn_failed",
            TimerError::Runtime { .. } => "timer_runtime_failed",
            TimerError::ZeroPeriod { .. } => "timer_zero_period",
        }
    }
}

