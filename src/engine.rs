//! # The engine as seen by the scheduling core.
//!
//! The scheduler never looks inside an mDNS engine. It needs three things:
//! - an identity to key the registry by ([`EngineId`]),
//! - a name for its timer threads,
//! - a [`PhaseFactory`] that builds the engine's phase tasks.
//!
//! Phase parameters ([`ServiceDescriptor`], [`IncomingMessage`]) are passed
//! through to the factory untouched; decoding and record handling belong to
//! the engine's collaborators.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::tasks::PhaseRef;

/// Shared handle to an engine.
pub type EngineRef = Arc<dyn Engine>;

static ENGINE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId(u64);

impl EngineId {
    /// Allocates a process-unique identity.
    pub fn next() -> Self {
        Self(ENGINE_SEQ.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine#{}", self.0)
    }
}

/// An mDNS engine instance, normally bound to one network interface.
pub trait Engine: Send + Sync + 'static {
    /// Stable identity; must not change for the engine's lifetime.
    fn id(&self) -> EngineId;

    /// Human-readable name (interface or host name), used in thread names.
    fn name(&self) -> &str;

    /// Factory for this engine's phase tasks.
    fn phases(&self) -> &dyn PhaseFactory;
}

/// Builds the phase tasks of one engine.
///
/// Every method returns a *new* phase bound to `engine`; the scheduler starts
/// it on the proper timer right away.
pub trait PhaseFactory: Send + Sync {
    /// Name-conflict probing.
    fn prober(&self, engine: &EngineRef) -> PhaseRef;
    /// Presence announcement.
    fn announcer(&self, engine: &EngineRef) -> PhaseRef;
    /// Record lifetime renewal.
    fn renewer(&self, engine: &EngineRef) -> PhaseRef;
    /// Goodbye announcements on shutdown.
    fn canceler(&self, engine: &EngineRef) -> PhaseRef;
    /// Cache expiry.
    fn reaper(&self, engine: &EngineRef) -> PhaseRef;
    /// Resolution of one service instance.
    fn service_info_resolver(&self, engine: &EngineRef, service: &ServiceDescriptor) -> PhaseRef;
    /// Discovery of service types.
    fn type_resolver(&self, engine: &EngineRef) -> PhaseRef;
    /// Discovery of instances of one service type.
    fn service_resolver(&self, engine: &EngineRef, service_type: &str) -> PhaseRef;
    /// Answer to one inbound query.
    fn responder(
        &self,
        engine: &EngineRef,
        message: &IncomingMessage,
        addr: IpAddr,
        port: u16,
    ) -> PhaseRef;
}

/// Service instance to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceDescriptor {
    /// Fully qualified service type, e.g. `_http._tcp.local.`.
    pub service_type: String,
    /// Instance name, e.g. `printer`.
    pub name: String,
    /// Optional subtype, e.g. `_printer`.
    pub subtype: Option<String>,
}

impl ServiceDescriptor {
    /// Creates a descriptor without subtype.
    pub fn new(service_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            service_type: service_type.into(),
            name: name.into(),
            subtype: None,
        }
    }

    /// Sets the subtype.
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// `<name>.<service_type>`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.name, self.service_type)
    }
}

/// Raw inbound packet that triggered a response.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    payload: Arc<[u8]>,
    received_at: Instant,
}

impl IncomingMessage {
    /// Wraps a received packet, stamped with the current instant.
    pub fn new(payload: impl Into<Arc<[u8]>>) -> Self {
        Self {
            payload: payload.into(),
            received_at: Instant::now(),
        }
    }

    /// Packet bytes as received.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Instant the packet was received.
    pub fn received_at(&self) -> Instant {
        self.received_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_ids_are_unique() {
        let a = EngineId::next();
        let b = EngineId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_qualified_name() {
        let svc = ServiceDescriptor::new("_http._tcp.local.", "printer").with_subtype("_printer");
        assert_eq!(svc.qualified_name(), "printer._http._tcp.local.");
        assert_eq!(svc.subtype.as_deref(), Some("_printer"));
    }

    #[test]
    fn test_incoming_message_keeps_payload() {
        let msg = IncomingMessage::new(vec![0u8, 1, 2]);
        assert_eq!(msg.payload(), &[0, 1, 2]);
        assert!(msg.received_at() <= Instant::now());
    }
}
