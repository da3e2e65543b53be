//! # Timer worker: the loop behind one guarded timer thread.
//!
//! Each [`GuardedTimer`](super::GuardedTimer) owns at most one worker, running
//! on a dedicated OS thread inside a single-threaded tokio runtime.
//!
//! ## Architecture
//! ```text
//! GuardedTimer ── Command::Schedule(entry) ──► rx ──┐
//!              ── Command::Purge           ──► rx ──┤
//!                                                    ▼
//!                                      loop { select! {
//!                                        token cancelled   → exit (shutdown)
//!                                        command           → insert / purge
//!                                        first due elapsed → fire(entry)
//!                                      }}
//!
//! fire(entry):
//!   ├─► skip if entry token cancelled
//!   ├─► publish TaskStarting
//!   ├─► task.run(ctx).catch_unwind()
//!   │     ├─ Ok          → TaskFinished
//!   │     ├─ Err(e)      → TaskFailed   (repeat only if e.is_retryable())
//!   │     └─ panic       → TaskPanicked (never repeated)
//!   └─► schedule.next_after(due, finished) → reinsert
//! ```
//!
//! ## Rules
//! - Runs are **sequential**: the loop awaits each run before polling again.
//! - Due entries are taken in deadline order; equal deadlines run in
//!   submission order (the queue is keyed by `(due, seq)`).
//! - One sleep covers the earliest deadline, capped at [`MAX_SLEEP`]; far
//!   deadlines are reached by sleeping again.
//! - Cancellation of the timer token stops the loop at the next poll; a run in
//!   progress is not interrupted.
//! - When every sender is gone the loop drains the queue, then exits.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use crate::error::TimerError;
use crate::events::{Bus, Event, EventKind};
use crate::tasks::{Schedule, TaskRef, saturating_add};

/// Longest single sleep of the worker.
const MAX_SLEEP: Duration = Duration::from_secs(60 * 60);

/// Pending entries ordered by deadline, then by arrival.
type Queue = BTreeMap<(Instant, u64), Entry>;

/// Messages from the timer handle to its worker.
pub(super) enum Command {
    Schedule(Entry),
    Purge,
}

/// One accepted submission.
pub(super) struct Entry {
    pub(super) task: TaskRef,
    pub(super) schedule: Schedule,
    /// Instant the next run is due at.
    pub(super) due: Instant,
    /// Per-submission token; child of the timer token.
    pub(super) ctx: CancellationToken,
}

pub(super) struct Worker {
    timer: Arc<str>,
    bus: Bus,
    token: CancellationToken,
}

impl Worker {
    pub(super) fn new(timer: Arc<str>, bus: Bus, token: CancellationToken) -> Self {
        Self { timer, bus, token }
    }

    /// Thread entry point.
    pub(super) fn run(self, rx: mpsc::UnboundedReceiver<Command>) {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
        {
            Ok(rt) => rt,
            Err(source) => {
                let err = TimerError::Runtime {
                    name: self.timer.to_string(),
                    source,
                };
                error!(timer = %self.timer, label = err.as_label(), "{err}");
                return;
            }
        };
        rt.block_on(self.run_loop(rx));
    }

    async fn run_loop(self, mut rx: mpsc::UnboundedReceiver<Command>) {
        let mut queue = Queue::new();
        let mut seq: u64 = 0;
        let mut open = true;

        loop {
            if !open && queue.is_empty() {
                debug!(timer = %self.timer, "timer drained");
                self.bus
                    .publish(Event::new(EventKind::TimerDrained).with_timer(self.timer.clone()));
                break;
            }

            let next_due = queue.first_key_value().map(|((due, _), _)| *due);
            let wake = match next_due {
                Some(due) => due.min(saturating_add(Instant::now(), MAX_SLEEP)),
                None => saturating_add(Instant::now(), MAX_SLEEP),
            };

            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                cmd = rx.recv(), if open => match cmd {
                    Some(Command::Schedule(entry)) => {
                        seq += 1;
                        queue.insert((entry.due, seq), entry);
                    }
                    Some(Command::Purge) => self.purge(&mut queue),
                    None => open = false,
                },
                _ = time::sleep_until(time::Instant::from_std(wake)), if next_due.is_some() => {
                    let entry = match queue.first_entry() {
                        Some(first) if first.key().0 <= Instant::now() => first.remove(),
                        _ => continue,
                    };
                    if let Some(entry) = self.fire(entry).await {
                        seq += 1;
                        queue.insert((entry.due, seq), entry);
                    }
                }
            }
        }

        if !queue.is_empty() {
            trace!(timer = %self.timer, pending = queue.len(), "dropping pending entries");
        }
    }

    /// Runs one due entry; returns it back if it must run again.
    async fn fire(&self, mut entry: Entry) -> Option<Entry> {
        if entry.ctx.is_cancelled() {
            return None;
        }

        let task: Arc<str> = Arc::from(entry.task.name());
        trace!(timer = %self.timer, task = %task, "task starting");
        self.publish(EventKind::TaskStarting, &task);

        let run = entry.task.run(entry.ctx.clone());
        let res = AssertUnwindSafe(run).catch_unwind().await;
        let finished = Instant::now();

        let keep = match res {
            Ok(Ok(())) => {
                self.publish(EventKind::TaskFinished, &task);
                true
            }
            Ok(Err(e)) => {
                warn!(
                    timer = %self.timer,
                    task = %task,
                    label = e.as_label(),
                    "task failed: {}",
                    e.as_message()
                );
                self.bus.publish(
                    Event::new(EventKind::TaskFailed)
                        .with_timer(self.timer.clone())
                        .with_task(task.clone())
                        .with_reason(e.to_string()),
                );
                e.is_retryable()
            }
            Err(panic_err) => {
                let info = panic_message(&*panic_err);
                error!(timer = %self.timer, task = %task, "task panicked: {info}");
                self.bus.publish(
                    Event::new(EventKind::TaskPanicked)
                        .with_timer(self.timer.clone())
                        .with_task(task.clone())
                        .with_reason(info),
                );
                false
            }
        };

        if !keep || entry.ctx.is_cancelled() {
            return None;
        }
        entry.due = entry.schedule.next_after(entry.due, finished)?;
        Some(entry)
    }

    /// Drops entries whose task cancelled its own token.
    fn purge(&self, queue: &mut Queue) {
        let before = queue.len();
        queue.retain(|_, entry| !entry.ctx.is_cancelled());
        let dropped = before - queue.len();

        debug!(timer = %self.timer, dropped, "timer purged");
        self.bus.publish(
            Event::new(EventKind::TimerPurged)
                .with_timer(self.timer.clone())
                .with_reason(dropped.to_string()),
        );
    }

    fn publish(&self, kind: EventKind, task: &Arc<str>) {
        self.bus.publish(
            Event::new(kind)
                .with_timer(self.timer.clone())
                .with_task(task.clone()),
        );
    }
}

fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
