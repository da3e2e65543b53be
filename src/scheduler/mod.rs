//! Per-engine schedulers.
//!
//! - [`instance`]: the [`InstanceScheduler`] contract and [`SchedulerRef`] handle;
//! - [`default`]: [`DefaultScheduler`], two guarded timers per engine.

mod default;
mod instance;

pub use default::DefaultScheduler;
pub use instance::{InstanceScheduler, SchedulerRef};
