//! Guarded timers.
//!
//! - [`guarded`]: the public [`GuardedTimer`] handle (submission, purge, shutdown);
//! - [`worker`]: the loop running on each timer's dedicated thread.

mod guarded;
mod worker;

pub use guarded::{GuardedTimer, TimerRef};
