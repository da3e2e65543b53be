use std::sync::Arc;

use crate::config::SchedulerConfig;

use super::{SchedulerRegistry, StrategyRef};

/// Builder for constructing an isolated [`SchedulerRegistry`].
///
/// Use it in tests and embedders that must not share the process-wide
/// [`SchedulerRegistry::global`] instance.
#[derive(Default)]
pub struct RegistryBuilder {
    cfg: SchedulerConfig,
    strategy: Option<StrategyRef>,
}

impl RegistryBuilder {
    /// Creates a builder with the default configuration and no strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration shared by the registry, its schedulers and timers.
    pub fn with_config(mut self, cfg: SchedulerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Installs a construction strategy from the start.
    pub fn with_strategy(mut self, strategy: StrategyRef) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Builds and returns the registry.
    pub fn build(self) -> Arc<SchedulerRegistry> {
        let registry = SchedulerRegistry::new(self.cfg);
        registry.set_strategy(self.strategy);
        Arc::new(registry)
    }
}
