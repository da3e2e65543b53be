//! # Default instance scheduler.
//!
//! [`DefaultScheduler`] owns two [`GuardedTimer`]s named after its engine:
//! - `"<prefix>(<engine>).timer"`: general timer,
//! - `"<prefix>(<engine>).state.timer"`: state timer.
//!
//! Each start operation asks the engine's [`PhaseFactory`](crate::PhaseFactory)
//! for a new phase and hands it the matching timer.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::trace;

use crate::config::SchedulerConfig;
use crate::engine::{EngineId, EngineRef, IncomingMessage, ServiceDescriptor};
use crate::events::Bus;
use crate::scheduler::InstanceScheduler;
use crate::tasks::PhaseRef;
use crate::timer::{GuardedTimer, TimerRef};

/// Two-timer scheduler used unless a strategy provides another one.
///
/// The state timer is the one expected to drain on drop, so a final goodbye
/// from `start_canceler` still goes out; the general timer is normally
/// cancelled outright.
pub struct DefaultScheduler {
    engine: EngineRef,
    timer: TimerRef,
    state_timer: TimerRef,
}

impl DefaultScheduler {
    /// Creates the scheduler and its (not yet started) timers.
    pub fn new(engine: EngineRef, cfg: &SchedulerConfig, bus: Bus) -> Self {
        let timer = GuardedTimer::arc(cfg.timer_name(engine.name()), cfg, bus.clone());
        let state_timer = GuardedTimer::arc(cfg.state_timer_name(engine.name()), cfg, bus);
        Self {
            engine,
            timer,
            state_timer,
        }
    }

    /// Creates the scheduler and returns it as a shared handle.
    pub fn arc(engine: EngineRef, cfg: &SchedulerConfig, bus: Bus) -> Arc<Self> {
        Arc::new(Self::new(engine, cfg, bus))
    }

    /// General timer: reaping, resolution, responses.
    pub fn timer(&self) -> &TimerRef {
        &self.timer
    }

    /// State timer: probe, announce, renew, cancel.
    pub fn state_timer(&self) -> &TimerRef {
        &self.state_timer
    }

    fn start_on(&self, phase: PhaseRef, timer: &TimerRef) {
        trace!(
            engine = self.engine.name(),
            timer = timer.name(),
            phase = phase.name(),
            "starting phase"
        );
        phase.start(timer);
    }
}

impl InstanceScheduler for DefaultScheduler {
    fn engine_id(&self) -> EngineId {
        self.engine.id()
    }

    fn purge_timer(&self) {
        self.timer.purge();
    }

    fn purge_state_timer(&self) {
        self.state_timer.purge();
    }

    fn cancel_timer(&self) {
        self.timer.shutdown();
    }

    fn cancel_state_timer(&self) {
        self.state_timer.shutdown();
    }

    fn start_prober(&self) {
        let phase = self.engine.phases().prober(&self.engine);
        self.start_on(phase, &self.state_timer);
    }

    fn start_announcer(&self) {
        let phase = self.engine.phases().announcer(&self.engine);
        self.start_on(phase, &self.state_timer);
    }

    fn start_renewer(&self) {
        let phase = self.engine.phases().renewer(&self.engine);
        self.start_on(phase, &self.state_timer);
    }

    fn start_canceler(&self) {
        let phase = self.engine.phases().canceler(&self.engine);
        self.start_on(phase, &self.state_timer);
    }

    fn start_reaper(&self) {
        let phase = self.engine.phases().reaper(&self.engine);
        self.start_on(phase, &self.timer);
    }

    fn start_service_info_resolver(&self, service: &ServiceDescriptor) {
        let phase = self
            .engine
            .phases()
            .service_info_resolver(&self.engine, service);
        self.start_on(phase, &self.timer);
    }

    fn start_type_resolver(&self) {
        let phase = self.engine.phases().type_resolver(&self.engine);
        self.start_on(phase, &self.timer);
    }

    fn start_service_resolver(&self, service_type: &str) {
        let phase = self
            .engine
            .phases()
            .service_resolver(&self.engine, service_type);
        self.start_on(phase, &self.timer);
    }

    fn start_responder(&self, message: &IncomingMessage, addr: IpAddr, port: u16) {
        let phase = self
            .engine
            .phases()
            .responder(&self.engine, message, addr, port);
        self.start_on(phase, &self.timer);
    }
}

impl std::fmt::Debug for DefaultScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultScheduler")
            .field("engine", &self.engine.id())
            .field("timer", &self.timer)
            .field("state_timer", &self.state_timer)
            .finish()
    }
}
