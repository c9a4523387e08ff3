//! Capabilities the engine borrows from its host: timers, task spawning,
//! frame capture and a presentation sink. The browser wires these to gloo
//! and `web_sys`; tests wire them to virtual-time doubles.

use futures::future::LocalBoxFuture;
use shared::{DetectionStats, ModelInfo};

use crate::error::EngineError;
use crate::history::HistoryRecord;

/// Cancellation handle for a scheduled timer. Cancelling is idempotent and
/// dropping the handle cancels the timer, so teardown happens on every exit
/// path that lets the handle go out of scope.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub trait Scheduler {
    /// Installs a timer firing every `period_ms` until cancelled.
    fn repeating(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> TimerHandle;
    /// Installs a one-shot timer firing after `delay_ms` unless cancelled.
    fn once(&self, delay_ms: u32, action: Box<dyn FnOnce()>) -> TimerHandle;
}

/// Spawns a non-`Send` future onto the host's single-threaded executor.
pub trait Spawner {
    fn spawn(&self, fut: LocalBoxFuture<'static, ()>);
}

/// One still frame pulled from the live camera feed.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Opaque capability that yields raw still frames on demand. How the device
/// stream is acquired is the host's business.
pub trait FrameSource {
    fn capture(&self) -> LocalBoxFuture<'static, Result<CapturedFrame, EngineError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    Initializing,
    Processing,
    Analyzing,
    Finalizing,
}

impl ProgressPhase {
    pub fn for_percent(percent: f64) -> Self {
        if percent < 30.0 {
            ProgressPhase::Initializing
        } else if percent < 60.0 {
            ProgressPhase::Processing
        } else if percent < 90.0 {
            ProgressPhase::Analyzing
        } else {
            ProgressPhase::Finalizing
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProgressPhase::Initializing => "Initializing detection...",
            ProgressPhase::Processing => "Processing media...",
            ProgressPhase::Analyzing => "Analyzing detections...",
            ProgressPhase::Finalizing => "Finalizing results...",
        }
    }
}

/// Simulated progress shown while a request is in flight. Not tied to real
/// transport progress; the request's true duration is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub percent: f64,
    pub phase: ProgressPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    pub index: usize,
    pub total: usize,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertView {
    pub severity: Severity,
    pub message: String,
    pub duration_ms: u32,
}

/// Border emphasis raised by the realtime loop; `fire` selects the harsher
/// styling, `audio` asks the host for an audible cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveAlert {
    pub fire: bool,
    pub audio: bool,
}

/// Everything the engine exposes upward. The host owns rendering; the
/// engine never touches a surface directly.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Progress(Option<ProgressUpdate>),
    BatchProgress(Option<BatchProgress>),
    Alert(Option<AlertView>),
    LiveAlert(Option<LiveAlert>),
    History(Vec<HistoryRecord>),
    Models(Vec<ModelInfo>),
    Stats(DetectionStats),
}

pub trait Presenter {
    fn emit(&self, update: UiUpdate);
}
