//! # Scheduler registry: one scheduler per live engine.
//!
//! The registry maps [`EngineId`] → [`SchedulerRef`]:
//! - `get_scheduler(engine)` → existing entry, or construct and insert one
//! - `dispose_scheduler(id)` → remove the entry (timers are left alone)
//!
//! ## Architecture
//! ```text
//! get_scheduler(engine)
//!   ├─► map.get(id) ── hit ──► return stored
//!   └─► miss:
//!         ├─► construct():  strategy? ── Some(s) ──► s
//!         │                     ├──── None / panic ──► DefaultScheduler (StrategyFallback)
//!         │                     └──── not installed ─► DefaultScheduler
//!         └─► map.entry(id):
//!               ├─ Vacant   → insert candidate, publish SchedulerCreated
//!               └─ Occupied → another thread won; return its scheduler, drop candidate
//! ```
//!
//! ## Rules
//! - Construction happens **outside** the map lock; a strategy may be slow or
//!   consult the registry without deadlocking.
//! - Only the stored scheduler is ever returned for a key; a losing candidate
//!   never started a timer thread (timers start lazily) and is simply dropped.
//! - The map is sharded (`DashMap`): unrelated engines do not contend.
//! - Disposal does not shut down timers and is idempotent.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, OnceLock, RwLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, warn};

use crate::config::SchedulerConfig;
use crate::engine::{EngineId, EngineRef};
use crate::events::{Bus, Event, EventKind};
use crate::scheduler::{DefaultScheduler, SchedulerRef};

use super::{RegistryBuilder, StrategyRef};

static GLOBAL: OnceLock<SchedulerRegistry> = OnceLock::new();

/// Registry of per-engine schedulers.
///
/// Most engines use [`SchedulerRegistry::global`], which lives for the whole
/// process. Tests and embedders that need isolation build their own with
/// [`SchedulerRegistry::builder`].
pub struct SchedulerRegistry {
    cfg: SchedulerConfig,
    bus: Bus,
    strategy: RwLock<Option<StrategyRef>>,
    schedulers: DashMap<EngineId, SchedulerRef>,
}

impl SchedulerRegistry {
    /// Creates an empty registry with no strategy installed.
    pub fn new(cfg: SchedulerConfig) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            cfg,
            bus,
            strategy: RwLock::new(None),
            schedulers: DashMap::new(),
        }
    }

    /// Returns a builder for an isolated registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Process-wide registry with the default configuration.
    ///
    /// Created on first call; concurrent first calls observe the same instance.
    pub fn global() -> &'static SchedulerRegistry {
        GLOBAL.get_or_init(|| SchedulerRegistry::new(SchedulerConfig::default()))
    }

    /// Configuration shared with created schedulers.
    pub fn config(&self) -> &SchedulerConfig {
        &self.cfg
    }

    /// Event bus shared with created schedulers and their timers.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Installs (`Some`) or clears (`None`) the construction strategy.
    ///
    /// Affects schedulers created afterwards only.
    pub fn set_strategy(&self, strategy: Option<StrategyRef>) {
        let mut slot = self
            .strategy
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = strategy;
    }

    /// Currently installed construction strategy.
    pub fn strategy(&self) -> Option<StrategyRef> {
        self.strategy
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns the scheduler for `engine`, creating and registering it if absent.
    pub fn get_scheduler(&self, engine: &EngineRef) -> SchedulerRef {
        let id = engine.id();
        if let Some(existing) = self.schedulers.get(&id) {
            return Arc::clone(existing.value());
        }

        let candidate = self.construct(engine);
        let (stored, created) = match self.schedulers.entry(id) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => (Arc::clone(entry.insert(candidate).value()), true),
        };

        if created {
            debug!(engine = engine.name(), id = %id, "scheduler created");
            self.bus.publish(
                Event::new(EventKind::SchedulerCreated).with_engine(id.to_string()),
            );
        } else {
            debug!(engine = engine.name(), id = %id, "lost creation race; using stored scheduler");
        }
        stored
    }

    /// Removes the entry for `id` and returns the removed scheduler.
    ///
    /// The scheduler's timers keep running until the caller cancels them.
    /// Disposing an unknown engine is a no-op.
    pub fn dispose_scheduler(&self, id: EngineId) -> Option<SchedulerRef> {
        let removed = self.schedulers.remove(&id).map(|(_, scheduler)| scheduler);
        if removed.is_some() {
            debug!(id = %id, "scheduler disposed");
            self.bus
                .publish(Event::new(EventKind::SchedulerDisposed).with_engine(id.to_string()));
        }
        removed
    }

    /// Returns true if a scheduler is registered for `id`.
    pub fn contains(&self, id: EngineId) -> bool {
        self.schedulers.contains_key(&id)
    }

    /// Number of registered schedulers.
    pub fn len(&self) -> usize {
        self.schedulers.len()
    }

    /// Returns true if no scheduler is registered.
    pub fn is_empty(&self) -> bool {
        self.schedulers.is_empty()
    }

    /// Returns sorted list of registered engine identities.
    pub fn engines(&self) -> Vec<EngineId> {
        let mut ids: Vec<EngineId> = self.schedulers.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Builds a scheduler through the strategy, falling back to the default.
    fn construct(&self, engine: &EngineRef) -> SchedulerRef {
        if let Some(strategy) = self.strategy() {
            let attempt = catch_unwind(AssertUnwindSafe(|| {
                strategy.new_scheduler(engine, &self.cfg, &self.bus)
            }));
            let reason = match attempt {
                Ok(Some(scheduler)) => return scheduler,
                Ok(None) => "declined".to_string(),
                Err(panic_err) => panic_message(&*panic_err),
            };
            warn!(engine = engine.name(), %reason, "strategy produced no scheduler; using default");
            self.bus.publish(
                Event::new(EventKind::StrategyFallback)
                    .with_engine(engine.id().to_string())
                    .with_reason(reason),
            );
        }
        DefaultScheduler::arc(Arc::clone(engine), &self.cfg, self.bus.clone())
    }
}

impl std::fmt::Debug for SchedulerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerRegistry")
            .field("cfg", &self.cfg)
            .field("schedulers", &self.engines())
            .field("strategy", &self.strategy().is_some())
            .finish()
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
