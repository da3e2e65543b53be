//! Scheduler registry.
//!
//! - [`map`]: [`SchedulerRegistry`], the engine → scheduler map;
//! - [`strategy`]: [`SchedulerStrategy`], the pluggable construction hook;
//! - [`builder`]: [`RegistryBuilder`] for isolated registries.

mod builder;
mod map;
mod strategy;

pub use builder::RegistryBuilder;
pub use map::SchedulerRegistry;
pub use strategy::{SchedulerStrategy, StrategyRef};
