//! Scheduler events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `GuardedTimer` (submission, shutdown, purge), the timer
//!   worker loop (task outcomes, drain) and `SchedulerRegistry` (create,
//!   dispose, strategy fallback).
//! - **Consumers**: anything holding a receiver from [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
