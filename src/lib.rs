//! # mdns-scheduler
//!
//! **mdns-scheduler** is the task-scheduling core of a multicast DNS
//! (mDNS / DNS-SD) engine. It starts, times and shuts down the background
//! phases that drive the protocol: probing, announcing, renewing, canceling,
//! cache reaping, resolution and query responses.
//!
//! Several engines can live in one process (typically one per network
//! interface). Each gets its own pair of timer threads, so shutting one down
//! never touches another.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   engine A (eth0)          engine B (wlan0)
//!        │                         │
//!        ▼ get_scheduler           ▼ get_scheduler
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  SchedulerRegistry (process-wide or injected)                     │
//! │  - DashMap<EngineId, SchedulerRef>  (create-if-absent, dispose)   │
//! │  - SchedulerStrategy (optional, falls back to DefaultScheduler)   │
//! │  - Bus (broadcast events)                                         │
//! └──────┬──────────────────────────────────────────────┬─────────────┘
//!        ▼                                              ▼
//! ┌──────────────────────────────┐      ┌──────────────────────────────┐
//! │ InstanceScheduler (A)        │      │ InstanceScheduler (B)        │
//! │  state timer   general timer │      │  state timer   general timer │
//! └──────┬──────────────┬────────┘      └──────┬──────────────┬────────┘
//!        ▼              ▼                      ▼              ▼
//!   GuardedTimer   GuardedTimer           GuardedTimer   GuardedTimer
//!   (own thread)   (own thread)           (own thread)   (own thread)
//! ```
//!
//! ### Lifecycle
//! ```text
//! registry.get_scheduler(engine) ──► scheduler.start_prober()
//!                                      └─► engine.phases().prober(engine) ──► PhaseTask::start(state timer)
//!                                                                              └─► timer.submit(task, schedule)
//! shutdown:
//!   scheduler.start_canceler()          (goodbye packets on the state timer)
//!   scheduler.cancel_timer()            (general timer closed; later submissions ignored)
//!   scheduler.cancel_state_timer()      (state timer closed)
//!   registry.dispose_scheduler(id)      (entry removed)
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                         |
//! |-------------------|----------------------------------------------------------------|--------------------------------------------|
//! | **Timers**        | Delayed/periodic execution with race-free, idempotent shutdown | [`GuardedTimer`], [`Schedule`]             |
//! | **Schedulers**    | One operation per protocol phase, two timer domains            | [`InstanceScheduler`], [`DefaultScheduler`]|
//! | **Registry**      | One scheduler per engine, pluggable construction               | [`SchedulerRegistry`], [`SchedulerStrategy`]|
//! | **Tasks**         | Async timer tasks and protocol phases                          | [`TimerTask`], [`TaskFn`], [`PhaseTask`]   |
//! | **Events**        | Broadcast of timer/registry events                             | [`Bus`], [`Event`], [`EventKind`]          |
//! | **Errors**        | Task outcomes and internal timer failures                      | [`TaskError`], [`TimerError`]              |
//! | **Configuration** | Thread naming, stack size, bus capacity, drop behaviour        | [`SchedulerConfig`]                        |
//!
//! ## Example
//! ```rust
//! use std::net::IpAddr;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use mdns_scheduler::{
//!     Engine, EngineId, EngineRef, IncomingMessage, PhaseFactory, PhaseRef, Schedule,
//!     ScheduledPhase, SchedulerRegistry, ServiceDescriptor, TaskError, TaskFn,
//! };
//!
//! struct Phases;
//!
//! fn phase(name: &'static str) -> PhaseRef {
//!     let task = TaskFn::arc(name, |_ctx: CancellationToken| async { Ok::<_, TaskError>(()) });
//!     ScheduledPhase::arc(task, Schedule::after(Duration::from_millis(1)))
//! }
//!
//! impl PhaseFactory for Phases {
//!     fn prober(&self, _: &EngineRef) -> PhaseRef { phase("prober") }
//!     fn announcer(&self, _: &EngineRef) -> PhaseRef { phase("announcer") }
//!     fn renewer(&self, _: &EngineRef) -> PhaseRef { phase("renewer") }
//!     fn canceler(&self, _: &EngineRef) -> PhaseRef { phase("canceler") }
//!     fn reaper(&self, _: &EngineRef) -> PhaseRef { phase("reaper") }
//!     fn service_info_resolver(&self, _: &EngineRef, _: &ServiceDescriptor) -> PhaseRef { phase("service-info") }
//!     fn type_resolver(&self, _: &EngineRef) -> PhaseRef { phase("types") }
//!     fn service_resolver(&self, _: &EngineRef, _: &str) -> PhaseRef { phase("services") }
//!     fn responder(&self, _: &EngineRef, _: &IncomingMessage, _: IpAddr, _: u16) -> PhaseRef { phase("responder") }
//! }
//!
//! struct Eth0 { id: EngineId }
//!
//! impl Engine for Eth0 {
//!     fn id(&self) -> EngineId { self.id }
//!     fn name(&self) -> &str { "eth0" }
//!     fn phases(&self) -> &dyn PhaseFactory { &Phases }
//! }
//!
//! let engine: EngineRef = Arc::new(Eth0 { id: EngineId::next() });
//! let registry = SchedulerRegistry::builder().build();
//!
//! let scheduler = registry.get_scheduler(&engine);
//! scheduler.start_prober();
//! scheduler.start_reaper();
//!
//! scheduler.cancel_timer();
//! scheduler.cancel_state_timer();
//! registry.dispose_scheduler(engine.id());
//! ```

mod config;
mod engine;
mod error;
mod events;
mod registry;
mod scheduler;
mod tasks;
mod timer;

// ---- Public re-exports ----

pub use config::SchedulerConfig;
pub use engine::{Engine, EngineId, EngineRef, IncomingMessage, PhaseFactory, ServiceDescriptor};
pub use error::{TaskError, TimerError};
pub use events::{Bus, Event, EventKind};
pub use registry::{RegistryBuilder, SchedulerRegistry, SchedulerStrategy, StrategyRef};
pub use scheduler::{DefaultScheduler, InstanceScheduler, SchedulerRef};
pub use tasks::{PhaseRef, PhaseTask, Schedule, ScheduledPhase, Start, TaskFn, TaskRef, TimerTask};
pub use timer::{GuardedTimer, TimerRef};
