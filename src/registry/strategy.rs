//! # Pluggable scheduler construction.
//!
//! A [`SchedulerStrategy`] gets the first chance to build the scheduler for a
//! new engine. Returning `None` (or panicking) makes the registry fall back to
//! [`DefaultScheduler`](crate::DefaultScheduler), so an extension can never
//! leave an engine without scheduling.
//!
//! Any `Fn(&EngineRef, &SchedulerConfig, &Bus) -> Option<SchedulerRef>` closure
//! is a strategy.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use mdns_scheduler::{Bus, EngineRef, SchedulerConfig, SchedulerRef, SchedulerRegistry, StrategyRef};
//!
//! // Only engines on "wlan*" interfaces get a custom scheduler; the rest use the default.
//! let strategy: StrategyRef = Arc::new(
//!     |engine: &EngineRef, _cfg: &SchedulerConfig, _bus: &Bus| -> Option<SchedulerRef> {
//!         if engine.name().starts_with("wlan") {
//!             // build and return a custom scheduler here
//!         }
//!         None
//!     },
//! );
//!
//! let registry = SchedulerRegistry::builder().with_strategy(strategy).build();
//! assert!(registry.strategy().is_some());
//! ```

use std::sync::Arc;

use crate::config::SchedulerConfig;
use crate::engine::EngineRef;
use crate::events::Bus;
use crate::scheduler::SchedulerRef;

/// Shared handle to a construction strategy.
pub type StrategyRef = Arc<dyn SchedulerStrategy>;

/// Builds alternative schedulers for new engines.
pub trait SchedulerStrategy: Send + Sync + 'static {
    /// Returns a scheduler for `engine`, or `None` to use the default one.
    ///
    /// `cfg` and `bus` are the registry's own, so custom schedulers can name
    /// and report their timers consistently.
    fn new_scheduler(
        &self,
        engine: &EngineRef,
        cfg: &SchedulerConfig,
        bus: &Bus,
    ) -> Option<SchedulerRef>;
}

impl<F> SchedulerStrategy for F
where
    F: Fn(&EngineRef, &SchedulerConfig, &Bus) -> Option<SchedulerRef> + Send + Sync + 'static,
{
    fn new_scheduler(
        &self,
        engine: &EngineRef,
        cfg: &SchedulerConfig,
        bus: &Bus,
    ) -> Option<SchedulerRef> {
        self(engine, cfg, bus)
    }
}
