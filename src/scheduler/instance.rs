//! # Per-engine scheduler contract.
//!
//! An [`InstanceScheduler`] binds each protocol phase to one of two timers:
//!
//! ```text
//!                 ┌──────────────────────── InstanceScheduler ────────────────────────┐
//!                 │                                                                    │
//!  start_prober ──┤                                                                    │
//!  start_announcer┤──► state timer   (probe → announce → renew → cancel lifecycle)     │
//!  start_renewer ─┤                                                                    │
//!  start_canceler ┤                                                                    │
//!                 │                                                                    │
//!  start_reaper ──┤                                                                    │
//!  start_*resolver┤──► general timer (reaping, resolution, query responses)            │
//!  start_responder┤                                                                    │
//!                 └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Every `start_*` call builds a **new** phase task; nothing is de-duplicated.
//! - No operation fails. After a timer has been cancelled, starts that target it
//!   are silently ignored.
//! - `cancel_timer` and `cancel_state_timer` are independent.
//! - The probe → announce → renew → cancel order is the caller's to enforce.

use std::net::IpAddr;
use std::sync::Arc;

use crate::engine::{EngineId, IncomingMessage, ServiceDescriptor};

/// Shared handle to an instance scheduler.
pub type SchedulerRef = Arc<dyn InstanceScheduler>;

/// Starts the protocol phases of one engine on its two timers.
pub trait InstanceScheduler: Send + Sync + 'static {
    /// Identity of the engine this scheduler serves.
    fn engine_id(&self) -> EngineId;

    /// Purges the general timer.
    fn purge_timer(&self);

    /// Purges the state timer.
    fn purge_state_timer(&self);

    /// Shuts down the general timer.
    fn cancel_timer(&self);

    /// Shuts down the state timer.
    fn cancel_state_timer(&self);

    /// Starts a new prober on the state timer.
    fn start_prober(&self);

    /// Starts a new announcer on the state timer.
    fn start_announcer(&self);

    /// Starts a new renewer on the state timer.
    fn start_renewer(&self);

    /// Starts a new canceler on the state timer.
    fn start_canceler(&self);

    /// Starts a new reaper on the general timer.
    ///
    /// Only one reaper is supposed to run per engine. This is not checked
    /// here: the engine starts its reaper once.
    fn start_reaper(&self);

    /// Starts a resolver for one service instance on the general timer.
    fn start_service_info_resolver(&self, service: &ServiceDescriptor);

    /// Starts a service type resolver on the general timer.
    fn start_type_resolver(&self);

    /// Starts a resolver for instances of `service_type` on the general timer.
    fn start_service_resolver(&self, service_type: &str);

    /// Starts a responder for an inbound query on the general timer.
    fn start_responder(&self, message: &IncomingMessage, addr: IpAddr, port: u16);
}
