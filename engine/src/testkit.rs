//! Deterministic doubles for the engine's ports: a virtual-time scheduler,
//! a scripted transport, a recording presenter and canned frame sources.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use shared::{
    DetectionResponse, DetectionStats, HistoryEntry, ModelInfo, RiskLevel,
};

use crate::error::EngineError;
use crate::ports::{
    AlertView, CapturedFrame, FrameSource, LiveAlert, Presenter, ProgressUpdate, Scheduler,
    Spawner, TimerHandle, UiUpdate,
};
use crate::submission::Submission;
use crate::transport::{DetectionTransport, TransportFuture};

pub fn response(detections: u32, fire: u32, smoke: u32) -> DetectionResponse {
    DetectionResponse {
        success: true,
        detection_count: detections,
        fire_count: fire,
        smoke_count: smoke,
        max_confidence: (detections > 0).then_some(0.85),
        processing_time: Some(0.42),
        risk_level: if fire > 0 {
            RiskLevel::High
        } else if smoke > 0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        },
        uploaded_file: None,
        processed_file: None,
        file_type: None,
        message: None,
    }
}

// ---------------------------------------------------------------------------
// virtual time

enum TimerKind {
    Repeating {
        period: u64,
        tick: Box<dyn FnMut()>,
    },
    Once {
        action: Option<Box<dyn FnOnce()>>,
    },
}

struct ScheduledTimer {
    id: u64,
    due: u64,
    cancelled: Rc<Cell<bool>>,
    kind: TimerKind,
}

#[derive(Default)]
struct SchedulerState {
    now: u64,
    next_id: u64,
    timers: Vec<ScheduledTimer>,
}

/// Scheduler driven by explicit `advance` calls. Callbacks run outside any
/// internal borrow, so they may schedule and cancel timers freely.
#[derive(Default)]
pub struct VirtualScheduler {
    state: RefCell<SchedulerState>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    pub fn active_timers(&self) -> usize {
        self.state
            .borrow()
            .timers
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    pub fn advance(&self, ms: u64) {
        let target = self.state.borrow().now + ms;
        loop {
            let next = {
                let state = self.state.borrow();
                state
                    .timers
                    .iter()
                    .filter(|t| !t.cancelled.get() && t.due <= target)
                    .min_by_key(|t| (t.due, t.id))
                    .map(|t| t.id)
            };
            let Some(id) = next else { break };

            let mut timer = {
                let mut state = self.state.borrow_mut();
                let index = state.timers.iter().position(|t| t.id == id).unwrap();
                let timer = state.timers.remove(index);
                state.now = timer.due;
                timer
            };

            match timer.kind {
                TimerKind::Repeating {
                    period,
                    ref mut tick,
                } => {
                    tick();
                    timer.due += period;
                    if !timer.cancelled.get() {
                        self.state.borrow_mut().timers.push(timer);
                    }
                }
                TimerKind::Once { ref mut action } => {
                    if let Some(action) = action.take() {
                        action();
                    }
                }
            }
        }
        self.state.borrow_mut().now = target;
    }

    fn install(&self, delay: u64, kind: TimerKind) -> TimerHandle {
        let cancelled = Rc::new(Cell::new(false));
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now + delay;
        state.timers.push(ScheduledTimer {
            id,
            due,
            cancelled: cancelled.clone(),
            kind,
        });
        TimerHandle::new(move || cancelled.set(true))
    }
}

impl Scheduler for VirtualScheduler {
    fn repeating(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> TimerHandle {
        self.install(
            period_ms as u64,
            TimerKind::Repeating {
                period: period_ms as u64,
                tick,
            },
        )
    }

    fn once(&self, delay_ms: u32, action: Box<dyn FnOnce()>) -> TimerHandle {
        self.install(delay_ms as u64, TimerKind::Once {
            action: Some(action),
        })
    }
}

// ---------------------------------------------------------------------------
// spawning

/// Routes spawned futures into a `LocalPool` the test drives by hand.
pub struct PoolSpawner {
    spawner: LocalSpawner,
}

impl PoolSpawner {
    pub fn new(spawner: LocalSpawner) -> Self {
        Self { spawner }
    }
}

impl Spawner for PoolSpawner {
    fn spawn(&self, fut: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(fut).expect("spawn on test pool");
    }
}

// ---------------------------------------------------------------------------
// transport

type DetectResult = Result<DetectionResponse, EngineError>;

/// Transport scripted from the outside. Responses queued with `resolve`
/// before a call complete immediately; otherwise the call pends until the
/// next `resolve`.
#[derive(Default)]
pub struct ManualTransport {
    queued: RefCell<VecDeque<DetectResult>>,
    waiting: RefCell<VecDeque<oneshot::Sender<DetectResult>>>,
    detect_calls: Cell<usize>,
    pub submissions: RefCell<Vec<Submission>>,
    pub history_entries: RefCell<Vec<HistoryEntry>>,
    pub models_list: RefCell<Vec<ModelInfo>>,
    pub stats_value: RefCell<DetectionStats>,
}

impl ManualTransport {
    pub fn detect_calls(&self) -> usize {
        self.detect_calls.get()
    }

    pub fn resolve(&self, result: DetectResult) {
        if let Some(waiter) = self.waiting.borrow_mut().pop_front() {
            let _ = waiter.send(result);
        } else {
            self.queued.borrow_mut().push_back(result);
        }
    }

    pub fn last_submission(&self) -> Option<Submission> {
        self.submissions.borrow().last().cloned()
    }
}

impl DetectionTransport for ManualTransport {
    fn detect(&self, submission: Submission) -> TransportFuture<DetectionResponse> {
        self.detect_calls.set(self.detect_calls.get() + 1);
        self.submissions.borrow_mut().push(submission);
        if let Some(result) = self.queued.borrow_mut().pop_front() {
            Box::pin(async move { result })
        } else {
            let (tx, rx) = oneshot::channel();
            self.waiting.borrow_mut().push_back(tx);
            Box::pin(async move {
                rx.await
                    .unwrap_or_else(|_| Err(EngineError::RequestFailed("cancelled".into())))
            })
        }
    }

    fn models(&self) -> TransportFuture<Vec<ModelInfo>> {
        let models = self.models_list.borrow().clone();
        Box::pin(async move { Ok(models) })
    }

    fn history(&self, limit: usize) -> TransportFuture<Vec<HistoryEntry>> {
        let entries: Vec<HistoryEntry> = self
            .history_entries
            .borrow()
            .iter()
            .take(limit)
            .cloned()
            .collect();
        Box::pin(async move { Ok(entries) })
    }

    fn stats(&self) -> TransportFuture<DetectionStats> {
        let stats = self.stats_value.borrow().clone();
        Box::pin(async move { Ok(stats) })
    }
}

// ---------------------------------------------------------------------------
// presentation

#[derive(Default)]
pub struct RecordingPresenter {
    pub updates: RefCell<Vec<UiUpdate>>,
}

impl Presenter for RecordingPresenter {
    fn emit(&self, update: UiUpdate) {
        self.updates.borrow_mut().push(update);
    }
}

impl RecordingPresenter {
    /// The alert currently on screen, replaying show/clear order.
    pub fn visible_alert(&self) -> Option<AlertView> {
        self.updates
            .borrow()
            .iter()
            .fold(None, |current, update| match update {
                UiUpdate::Alert(alert) => alert.clone(),
                _ => current,
            })
    }

    pub fn count_alert_clears(&self) -> usize {
        self.updates
            .borrow()
            .iter()
            .filter(|u| matches!(u, UiUpdate::Alert(None)))
            .count()
    }

    pub fn progress_updates(&self) -> Vec<ProgressUpdate> {
        self.updates
            .borrow()
            .iter()
            .filter_map(|u| match u {
                UiUpdate::Progress(Some(update)) => Some(update.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn progress_cleared(&self) -> bool {
        self.updates
            .borrow()
            .iter()
            .any(|u| matches!(u, UiUpdate::Progress(None)))
    }

    pub fn batch_progress_events(&self) -> Vec<Option<crate::ports::BatchProgress>> {
        self.updates
            .borrow()
            .iter()
            .filter_map(|u| match u {
                UiUpdate::BatchProgress(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_live_alert(&self) -> Option<Option<LiveAlert>> {
        self.updates
            .borrow()
            .iter()
            .rev()
            .find_map(|u| match u {
                UiUpdate::LiveAlert(alert) => Some(*alert),
                _ => None,
            })
    }

    pub fn last_history(&self) -> Option<Vec<crate::history::HistoryRecord>> {
        self.updates
            .borrow()
            .iter()
            .rev()
            .find_map(|u| match u {
                UiUpdate::History(records) => Some(records.clone()),
                _ => None,
            })
    }

    pub fn last_models(&self) -> Option<Vec<ModelInfo>> {
        self.updates
            .borrow()
            .iter()
            .rev()
            .find_map(|u| match u {
                UiUpdate::Models(models) => Some(models.clone()),
                _ => None,
            })
    }
}

// ---------------------------------------------------------------------------
// frames

/// Always yields the same small frame.
pub struct StaticFrames;

impl FrameSource for StaticFrames {
    fn capture(&self) -> LocalBoxFuture<'static, Result<CapturedFrame, EngineError>> {
        Box::pin(async {
            Ok(CapturedFrame {
                bytes: vec![0xFF; 32],
                filename: "live_frame.jpg".into(),
            })
        })
    }
}

/// Simulates an unreadable camera.
pub struct FailingFrames;

impl FrameSource for FailingFrames {
    fn capture(&self) -> LocalBoxFuture<'static, Result<CapturedFrame, EngineError>> {
        Box::pin(async { Err(EngineError::RequestFailed("camera unavailable".into())) })
    }
}
