//! # GuardedTimer: delayed/periodic execution with race-free shutdown.
//!
//! A [`GuardedTimer`] accepts [`TimerTask`](crate::TimerTask)s with a
//! [`Schedule`] and runs them on a dedicated thread. Its one-way
//! [`shutdown`](GuardedTimer::shutdown) turns every later submission into a
//! silent no-op instead of an error.
//!
//! ## Submissions racing shutdown
//! Protocol phases reschedule themselves as part of normal operation (retries,
//! the next announcement, the next probe). Such a reschedule can race with the
//! engine shutting the timer down. Both sides serialize on one mutex and the
//! closed flag is checked first inside it:
//! ```text
//! submit(task)                          shutdown()
//!   lock ──► closed? ──► yes: ignore      lock ──► closed? ──► yes: return
//!              │                                     │
//!              └─► no: send to worker                └─► no: closed = true
//!   unlock                                               cancel token, drop sender
//!                                                    unlock
//! ```
//! Once `shutdown()` has taken the lock no submission can reach the worker.
//! A submission that got in first is discarded with the rest of the queue when
//! the worker observes the cancelled token.
//!
//! ## Lifecycle
//! - The worker thread is spawned lazily on the first accepted submission.
//! - `shutdown()` cancels pending entries; a run already in progress completes.
//! - Dropping the last handle without `shutdown()` lets the worker drain its
//!   queue (or cancels it, depending on [`SchedulerConfig::drain_on_drop`]).

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use crate::config::SchedulerConfig;
use crate::error::TimerError;
use crate::events::{Bus, Event, EventKind};
use crate::tasks::{Schedule, Start, TaskRef};

use super::worker::{Command, Entry, Worker};

/// Shared handle to a guarded timer.
pub type TimerRef = Arc<GuardedTimer>;

/// State guarded by the timer mutex.
struct Inner {
    /// One-way flag; never reset once set.
    closed: bool,
    /// Parent of every submission token; cancelled on shutdown.
    token: CancellationToken,
    /// Sender to the worker; `None` until the first submission and after shutdown.
    tx: Option<mpsc::UnboundedSender<Command>>,
}

/// Timer with a one-way, race-free shutdown.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use mdns_scheduler::{Bus, GuardedTimer, SchedulerConfig, TaskError, TaskFn};
///
/// let timer = GuardedTimer::new("mdns(eth0).timer", &SchedulerConfig::default(), Bus::new(16));
/// let task = TaskFn::arc("noop", |_ctx: CancellationToken| async { Ok::<_, TaskError>(()) });
///
/// timer.schedule(task.clone(), Duration::from_millis(10));
/// timer.shutdown();
/// timer.shutdown(); // idempotent
///
/// // Ignored, not an error.
/// timer.schedule(task, Duration::ZERO);
/// assert!(timer.is_shutdown());
/// ```
pub struct GuardedTimer {
    name: Arc<str>,
    bus: Bus,
    stack_size: Option<usize>,
    drain_on_drop: bool,
    inner: Mutex<Inner>,
}

impl GuardedTimer {
    /// Creates a timer. No thread is started until the first submission.
    pub fn new(name: impl Into<Arc<str>>, cfg: &SchedulerConfig, bus: Bus) -> Self {
        Self {
            name: name.into(),
            bus,
            stack_size: cfg.stack_size(),
            drain_on_drop: cfg.drain_on_drop,
            inner: Mutex::new(Inner {
                closed: false,
                token: CancellationToken::new(),
                tx: None,
            }),
        }
    }

    /// Creates the timer and returns it as a shared handle.
    pub fn arc(name: impl Into<Arc<str>>, cfg: &SchedulerConfig, bus: Bus) -> TimerRef {
        Arc::new(Self::new(name, cfg, bus))
    }

    /// Timer (and worker thread) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutdown(&self) -> bool {
        self.lock().closed
    }

    /// Runs `task` once after `delay`.
    pub fn schedule(&self, task: TaskRef, delay: Duration) {
        self.submit(task, Schedule::after(delay));
    }

    /// Runs `task` once at `at`.
    pub fn schedule_at(&self, task: TaskRef, at: Instant) {
        self.submit(task, Schedule::at(at));
    }

    /// Runs `task` after `delay`, then again `period` after each run finishes.
    pub fn schedule_repeating(&self, task: TaskRef, delay: Duration, period: Duration) {
        self.submit(task, Schedule::fixed_delay(delay, period));
    }

    /// Runs `task` at `first`, then again `period` after each run finishes.
    pub fn schedule_repeating_from(&self, task: TaskRef, first: Instant, period: Duration) {
        self.submit(
            task,
            Schedule::FixedDelay {
                first: Start::At(first),
                period,
            },
        );
    }

    /// Runs `task` after `delay`, then every `period` measured from that first instant.
    pub fn schedule_at_fixed_rate(&self, task: TaskRef, delay: Duration, period: Duration) {
        self.submit(task, Schedule::fixed_rate(delay, period));
    }

    /// Runs `task` at `first`, then every `period` measured from `first`.
    pub fn schedule_at_fixed_rate_from(&self, task: TaskRef, first: Instant, period: Duration) {
        self.submit(
            task,
            Schedule::FixedRate {
                first: Start::At(first),
                period,
            },
        );
    }

    /// Submits `task` with `schedule`.
    ///
    /// Silently ignored after shutdown. A repeating schedule with a zero
    /// period is dropped and reported as `SubmissionRejected`.
    pub fn submit(&self, task: TaskRef, schedule: Schedule) {
        let mut inner = self.lock();
        if inner.closed {
            drop(inner);
            trace!(timer = %self.name, task = task.name(), "submission after shutdown ignored");
            self.bus.publish(
                Event::new(EventKind::SubmissionIgnored)
                    .with_timer(self.name.clone())
                    .with_task(task.name()),
            );
            return;
        }

        if schedule.has_zero_period() {
            drop(inner);
            let err = TimerError::ZeroPeriod {
                task: task.name().to_string(),
            };
            warn!(timer = %self.name, label = err.as_label(), "{err}");
            self.reject(task.name(), &err);
            return;
        }

        if let Err(err) = self.ensure_worker(&mut inner) {
            drop(inner);
            error!(timer = %self.name, label = err.as_label(), "{err}");
            self.reject(task.name(), &err);
            return;
        }

        let now = Instant::now();
        let delay = schedule.first().delay_from(now);
        let entry = Entry {
            task,
            schedule,
            due: schedule.first().resolve(now),
            ctx: inner.token.child_token(),
        };
        let name: Arc<str> = Arc::from(entry.task.name());

        let sent = match &inner.tx {
            Some(tx) => tx.send(Command::Schedule(entry)).is_ok(),
            None => false,
        };
        if !sent {
            // Worker exited without shutdown (runtime build failure); respawn next time.
            inner.tx = None;
            drop(inner);
            warn!(timer = %self.name, task = %name, "timer worker gone; submission dropped");
            self.bus.publish(
                Event::new(EventKind::SubmissionRejected)
                    .with_timer(self.name.clone())
                    .with_task(name)
                    .with_reason("worker_gone"),
            );
            return;
        }
        drop(inner);
        trace!(timer = %self.name, task = %name, ?delay, "task scheduled");
        self.bus.publish(
            Event::new(EventKind::TaskScheduled)
                .with_timer(self.name.clone())
                .with_task(name)
                .with_delay(delay),
        );
    }

    /// Drops pending entries whose task cancelled its own token.
    ///
    /// Never fails; a no-op after shutdown or before the first submission.
    pub fn purge(&self) {
        let inner = self.lock();
        if inner.closed {
            return;
        }
        if let Some(tx) = &inner.tx {
            let _ = tx.send(Command::Purge);
        }
    }

    /// Transitions the timer to the closed state.
    ///
    /// Idempotent: only the first call cancels pending entries and releases
    /// the worker; later calls return immediately. Never blocks on the worker,
    /// so a task may shut down the timer it is running on.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        inner.token.cancel();
        inner.tx = None;
        drop(inner);

        debug!(timer = %self.name, "timer shut down");
        self.bus
            .publish(Event::new(EventKind::TimerShutdown).with_timer(self.name.clone()));
    }

    /// Spawns the worker thread if it is not running.
    fn ensure_worker(&self, inner: &mut Inner) -> Result<(), TimerError> {
        if inner.tx.as_ref().is_some_and(|tx| !tx.is_closed()) {
            return Ok(());
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker::new(self.name.clone(), self.bus.clone(), inner.token.clone());

        let mut builder = thread::Builder::new().name(self.name.to_string());
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        builder
            .spawn(move || worker.run(rx))
            .map_err(|source| TimerError::Spawn {
                name: self.name.to_string(),
                source,
            })?;

        inner.tx = Some(tx);
        debug!(timer = %self.name, "timer thread started");
        self.bus
            .publish(Event::new(EventKind::TimerStarted).with_timer(self.name.clone()));
        Ok(())
    }

    fn reject(&self, task: &str, err: &TimerError) {
        self.bus.publish(
            Event::new(EventKind::SubmissionRejected)
                .with_timer(self.name.clone())
                .with_task(task)
                .with_reason(err.as_label()),
        );
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for GuardedTimer {
    fn drop(&mut self) {
        if !self.drain_on_drop {
            self.shutdown();
        }
    }
}

impl std::fmt::Debug for GuardedTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedTimer")
            .field("name", &self.name)
            .field("closed", &self.is_shutdown())
            .finish()
    }
}
