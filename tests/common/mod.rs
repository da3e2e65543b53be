//! Shared fixtures: a recording mock engine and event helpers.

#![allow(dead_code)]

use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use mdns_scheduler::{
    Engine, EngineId, EngineRef, Event, EventKind, IncomingMessage, PhaseFactory, PhaseRef,
    PhaseTask, Schedule, ServiceDescriptor, TaskError, TaskFn, TimerRef,
};

pub const WAIT: Duration = Duration::from_secs(2);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One `PhaseTask::start` call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseStart {
    pub phase: String,
    pub timer: String,
}

/// Collects phase starts and task runs of a mock engine.
pub struct Recorder {
    starts: Mutex<Vec<PhaseStart>>,
    runs: mpsc::UnboundedSender<String>,
}

impl Recorder {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let rec = Arc::new(Self {
            starts: Mutex::new(Vec::new()),
            runs: tx,
        });
        (rec, rx)
    }

    pub fn starts(&self) -> Vec<PhaseStart> {
        self.starts.lock().unwrap().clone()
    }

    pub fn timer_of(&self, phase: &str) -> Option<String> {
        self.starts()
            .into_iter()
            .find(|s| s.phase == phase)
            .map(|s| s.timer)
    }
}

/// Phase that records where it was started and submits one reporting task.
struct RecordingPhase {
    name: String,
    schedule: Schedule,
    recorder: Arc<Recorder>,
}

impl PhaseTask for RecordingPhase {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(self: Arc<Self>, timer: &TimerRef) {
        self.recorder.starts.lock().unwrap().push(PhaseStart {
            phase: self.name.clone(),
            timer: timer.name().to_string(),
        });

        let runs = self.recorder.runs.clone();
        let label = self.name.clone();
        let task = TaskFn::arc(self.name.clone(), move |_ctx: CancellationToken| {
            let runs = runs.clone();
            let label = label.clone();
            async move {
                let _ = runs.send(label);
                Ok::<(), TaskError>(())
            }
        });
        timer.submit(task, self.schedule);
    }
}

pub struct MockPhases {
    recorder: Arc<Recorder>,
    schedule: Schedule,
}

impl MockPhases {
    fn phase(&self, name: impl Into<String>) -> PhaseRef {
        Arc::new(RecordingPhase {
            name: name.into(),
            schedule: self.schedule,
            recorder: Arc::clone(&self.recorder),
        })
    }
}

impl PhaseFactory for MockPhases {
    fn prober(&self, _: &EngineRef) -> PhaseRef {
        self.phase("prober")
    }

    fn announcer(&self, _: &EngineRef) -> PhaseRef {
        self.phase("announcer")
    }

    fn renewer(&self, _: &EngineRef) -> PhaseRef {
        self.phase("renewer")
    }

    fn canceler(&self, _: &EngineRef) -> PhaseRef {
        self.phase("canceler")
    }

    fn reaper(&self, _: &EngineRef) -> PhaseRef {
        self.phase("reaper")
    }

    fn service_info_resolver(&self, _: &EngineRef, service: &ServiceDescriptor) -> PhaseRef {
        self.phase(format!("service-info:{}", service.qualified_name()))
    }

    fn type_resolver(&self, _: &EngineRef) -> PhaseRef {
        self.phase("type-resolver")
    }

    fn service_resolver(&self, _: &EngineRef, service_type: &str) -> PhaseRef {
        self.phase(format!("service-resolver:{service_type}"))
    }

    fn responder(
        &self,
        _: &EngineRef,
        message: &IncomingMessage,
        addr: IpAddr,
        port: u16,
    ) -> PhaseRef {
        self.phase(format!("responder:{addr}:{port}:{}", message.payload().len()))
    }
}

pub struct MockEngine {
    id: EngineId,
    name: String,
    phases: MockPhases,
}

impl Engine for MockEngine {
    fn id(&self) -> EngineId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn phases(&self) -> &dyn PhaseFactory {
        &self.phases
    }
}

/// Engine whose phases run once, `delay` after being started.
pub fn engine_with_delay(
    name: &str,
    delay: Duration,
) -> (EngineRef, Arc<Recorder>, mpsc::UnboundedReceiver<String>) {
    let (recorder, rx) = Recorder::new();
    let engine: EngineRef = Arc::new(MockEngine {
        id: EngineId::next(),
        name: name.to_string(),
        phases: MockPhases {
            recorder: Arc::clone(&recorder),
            schedule: Schedule::after(delay),
        },
    });
    (engine, recorder, rx)
}

pub fn engine(name: &str) -> (EngineRef, Arc<Recorder>, mpsc::UnboundedReceiver<String>) {
    engine_with_delay(name, Duration::from_millis(1))
}

/// Waits for the next event of `kind`, skipping others.
pub async fn next_event(rx: &mut broadcast::Receiver<Event>, kind: EventKind) -> Option<Event> {
    timeout(WAIT, async {
        loop {
            match rx.recv().await {
                Ok(ev) if ev.kind == kind => return Some(ev),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .await
    .ok()
    .flatten()
}

/// Receives exactly `n` labels or panics after [`WAIT`].
pub async fn recv_n(rx: &mut mpsc::UnboundedReceiver<String>, n: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let label = timeout(WAIT, rx.recv())
            .await
            .expect("timed out waiting for a run")
            .expect("recorder closed");
        out.push(label);
    }
    out
}

/// Asserts nothing arrives on `rx` for `quiet`.
pub async fn assert_quiet<T: std::fmt::Debug>(rx: &mut mpsc::UnboundedReceiver<T>, quiet: Duration) {
    if let Ok(Some(v)) = timeout(quiet, rx.recv()).await {
        panic!("unexpected run: {v:?}");
    }
}
