//! # Example: two_interfaces
//!
//! Two mDNS engines (one per interface) sharing one registry.
//!
//! Demonstrates how to:
//! - Provide phases through a [`PhaseFactory`].
//! - Start the probe → announce lifecycle and a reaper per engine.
//! - Shut one engine down while the other keeps running.
//! - Watch scheduler events on the registry [`Bus`](mdns_scheduler::Bus).
//!
//! ## Flow
//! ```text
//! registry.get_scheduler(eth0) ──► start_prober()  (3 probes, 250ms apart)
//!                              ──► start_reaper()   (every 400ms)
//! registry.get_scheduler(wlan0) ─► same
//! after 1s:  eth0 start_canceler() ──► cancel_timer() ──► cancel_state_timer() ──► dispose
//! after 2s:  wlan0 shuts down the same way
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=mdns_scheduler=debug cargo run --example two_interfaces
//! ```

use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use mdns_scheduler::{
    Engine, EngineId, EngineRef, EventKind, IncomingMessage, PhaseFactory, PhaseRef, Schedule,
    ScheduledPhase, SchedulerRegistry, ServiceDescriptor, TaskError, TaskFn,
};

/// Phases that print what they would send.
struct PrintingPhases;

/// Prints a line per run and stops itself after `limit` runs (0 = never).
fn printing(engine: &EngineRef, what: &'static str, limit: u32, schedule: Schedule) -> PhaseRef {
    let who = engine.name().to_string();
    let runs = Arc::new(AtomicU32::new(0));
    let task = TaskFn::arc(what, move |ctx: CancellationToken| {
        let who = who.clone();
        let runs = Arc::clone(&runs);
        async move {
            let n = runs.fetch_add(1, Ordering::Relaxed) + 1;
            println!("[{who}] {what} #{n}");
            if limit > 0 && n >= limit {
                ctx.cancel();
            }
            Ok::<(), TaskError>(())
        }
    });
    ScheduledPhase::arc(task, schedule)
}

impl PhaseFactory for PrintingPhases {
    fn prober(&self, engine: &EngineRef) -> PhaseRef {
        printing(engine, "probe", 3, Schedule::fixed_rate(Duration::ZERO, Duration::from_millis(250)))
    }

    fn announcer(&self, engine: &EngineRef) -> PhaseRef {
        printing(engine, "announce", 2, Schedule::fixed_delay(Duration::ZERO, Duration::from_secs(1)))
    }

    fn renewer(&self, engine: &EngineRef) -> PhaseRef {
        printing(engine, "renew", 1, Schedule::after(Duration::from_secs(60)))
    }

    fn canceler(&self, engine: &EngineRef) -> PhaseRef {
        printing(engine, "goodbye", 1, Schedule::after(Duration::ZERO))
    }

    fn reaper(&self, engine: &EngineRef) -> PhaseRef {
        printing(engine, "reap", 0, Schedule::fixed_delay(Duration::ZERO, Duration::from_millis(400)))
    }

    fn service_info_resolver(&self, engine: &EngineRef, _: &ServiceDescriptor) -> PhaseRef {
        printing(engine, "resolve-info", 1, Schedule::after(Duration::ZERO))
    }

    fn type_resolver(&self, engine: &EngineRef) -> PhaseRef {
        printing(engine, "resolve-types", 1, Schedule::after(Duration::ZERO))
    }

    fn service_resolver(&self, engine: &EngineRef, _: &str) -> PhaseRef {
        printing(engine, "resolve-services", 1, Schedule::after(Duration::ZERO))
    }

    fn responder(&self, engine: &EngineRef, _: &IncomingMessage, _: IpAddr, _: u16) -> PhaseRef {
        printing(engine, "respond", 1, Schedule::after(Duration::from_millis(20)))
    }
}

struct Interface {
    id: EngineId,
    name: &'static str,
}

impl Engine for Interface {
    fn id(&self) -> EngineId {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn phases(&self) -> &dyn PhaseFactory {
        &PrintingPhases
    }
}

fn shutdown(registry: &SchedulerRegistry, engine: &EngineRef) {
    let scheduler = registry.get_scheduler(engine);
    scheduler.start_canceler();
    scheduler.cancel_timer();
    // Give the goodbye a moment before closing the state timer.
    std::thread::sleep(Duration::from_millis(50));
    scheduler.cancel_state_timer();
    registry.dispose_scheduler(engine.id());
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let registry = SchedulerRegistry::global();
    let mut events = registry.bus().subscribe();
    println!("bus receivers: {}", registry.bus().receiver_count());
    let watcher = tokio::spawn(async move {
        let mut outcomes = 0u32;
        while let Ok(ev) = events.recv().await {
            if ev.is_task_outcome() {
                outcomes += 1;
            } else if matches!(
                ev.kind,
                EventKind::SchedulerCreated | EventKind::TimerStarted | EventKind::TimerShutdown
            ) {
                println!("  event {:?} timer={:?} engine={:?}", ev.kind, ev.timer, ev.engine);
            }
        }
        outcomes
    });

    let eth0: EngineRef = Arc::new(Interface { id: EngineId::next(), name: "eth0" });
    let wlan0: EngineRef = Arc::new(Interface { id: EngineId::next(), name: "wlan0" });

    for engine in [&eth0, &wlan0] {
        let scheduler = registry.get_scheduler(engine);
        scheduler.start_prober();
        scheduler.start_reaper();
    }

    tokio::time::sleep(Duration::from_secs(1)).await;
    shutdown(registry, &eth0);
    println!("eth0 down; wlan0 keeps running");

    tokio::time::sleep(Duration::from_secs(1)).await;
    shutdown(registry, &wlan0);
    println!("registry empty: {}", registry.is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    watcher.abort();
    if let Ok(outcomes) = watcher.await {
        println!("task runs observed: {outcomes}");
    }
}
