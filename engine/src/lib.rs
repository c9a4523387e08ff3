//! Client-side orchestration engine for the remote fire/smoke detection
//! service. Sequences file and batch submissions, runs the cancellable
//! realtime loop against a live camera feed, reconciles push and polling
//! events, and maintains the bounded history ledger with deduplicated
//! alerts. Platform concerns (HTTP, timers, frame capture, rendering) are
//! ports implemented by the host.

pub mod alerts;
pub mod batch;
pub mod engine;
pub mod error;
pub mod history;
pub mod ports;
pub mod processor;
pub mod realtime;
pub mod settings;
pub mod submission;
pub mod transport;

#[cfg(test)]
mod testkit;

pub use alerts::{ALERT_DURATION_MS, AlertDispatcher, classify};
pub use batch::{BatchInput, BatchItemOutcome, BatchOutcome, BatchProcessor};
pub use engine::{DetectionEngine, EngineDeps};
pub use error::EngineError;
pub use history::{HISTORY_CAP, HistoryLedger, HistoryRecord};
pub use ports::{
    AlertView, BatchProgress, CapturedFrame, FrameSource, LiveAlert, Presenter, ProgressPhase,
    ProgressUpdate, Scheduler, Severity, Spawner, TimerHandle, UiUpdate,
};
pub use processor::{PROGRESS_CAP, PROGRESS_TICK_MS, Processor};
pub use realtime::{LIVE_ALERT_MS, LoopState, REALTIME_PERIOD_MS, RealtimeMonitor};
pub use settings::{DEFAULT_CONFIDENCE, DEFAULT_MODEL, Settings};
pub use submission::Submission;
pub use transport::{DetectionTransport, EventSource, TransportFuture};
