use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, error, info, warn};
use shared::{DetectionResponse, PushEvent};

use crate::alerts::{self, AlertDispatcher};
use crate::batch::{BatchInput, BatchOutcome, BatchProcessor};
use crate::error::EngineError;
use crate::history::{HISTORY_CAP, HistoryLedger, HistoryRecord};
use crate::ports::{FrameSource, Presenter, Scheduler, Severity, Spawner, UiUpdate};
use crate::processor::Processor;
use crate::realtime::{LoopState, RealtimeMonitor};
use crate::settings::Settings;
use crate::submission::Submission;
use crate::transport::{DetectionTransport, EventSource};

/// Everything the engine borrows from its host environment.
pub struct EngineDeps {
    pub transport: Rc<dyn DetectionTransport>,
    pub scheduler: Rc<dyn Scheduler>,
    pub spawner: Rc<dyn Spawner>,
    pub presenter: Rc<dyn Presenter>,
    pub frames: Rc<dyn FrameSource>,
    pub events: Option<Rc<dyn EventSource>>,
}

/// Client-side orchestrator for the remote detection service. Owns the
/// settings, the history ledger, the alert surface and the realtime loop;
/// the host drives it through the operations below and renders whatever the
/// presenter port emits.
pub struct DetectionEngine {
    weak: Weak<DetectionEngine>,
    transport: Rc<dyn DetectionTransport>,
    presenter: Rc<dyn Presenter>,
    events: Option<Rc<dyn EventSource>>,
    settings: Rc<RefCell<Settings>>,
    processor: Processor,
    batch: BatchProcessor,
    alerts: AlertDispatcher,
    ledger: RefCell<HistoryLedger>,
    realtime: RefCell<RealtimeMonitor>,
}

impl DetectionEngine {
    pub fn new(deps: EngineDeps) -> Rc<Self> {
        let settings = Rc::new(RefCell::new(Settings::default()));
        let processor = Processor::new(
            deps.transport.clone(),
            deps.scheduler.clone(),
            deps.presenter.clone(),
        );
        let batch = BatchProcessor::new(
            processor.clone(),
            deps.presenter.clone(),
            settings.clone(),
        );
        let alerts = AlertDispatcher::new(deps.scheduler.clone(), deps.presenter.clone());
        let realtime = RealtimeMonitor::new(
            processor.clone(),
            deps.frames,
            settings.clone(),
            deps.scheduler,
            deps.spawner,
            deps.presenter.clone(),
        );

        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            transport: deps.transport,
            presenter: deps.presenter,
            events: deps.events,
            settings,
            processor,
            batch,
            alerts,
            ledger: RefCell::new(HistoryLedger::default()),
            realtime: RefCell::new(realtime),
        })
    }

    /// Startup sequence: model catalogue, history seed, stats, then the
    /// best-effort push channel. Each step failing is logged and skipped;
    /// the engine stays usable over plain requests.
    pub async fn bootstrap(&self) {
        match self.transport.models().await {
            Ok(models) => self.presenter.emit(UiUpdate::Models(models)),
            Err(err) => warn!("model listing unavailable: {err}"),
        }

        match self.transport.history(HISTORY_CAP).await {
            Ok(entries) => {
                self.ledger.borrow_mut().seed(entries);
                self.emit_history();
            }
            Err(err) => warn!("history seed failed: {err}"),
        }

        self.refresh_stats().await;
        self.connect_events();
        info!("engine bootstrapped");
    }

    fn connect_events(&self) {
        let Some(events) = &self.events else { return };
        let weak = self.weak.clone();
        let result = events.connect(Box::new(move |event| {
            if let Some(engine) = weak.upgrade() {
                engine.handle_push_event(event);
            }
        }));
        if let Err(err) = result {
            warn!("push channel unavailable, continuing without it: {err}");
        }
    }

    pub fn handle_push_event(&self, event: PushEvent) {
        if event.kind == PushEvent::DETECTION_UPDATE {
            self.alerts.show(Severity::Info, event.message);
        } else {
            debug!("ignoring push event of type {:?}", event.kind);
        }
    }

    /// On-demand single submission: full progress indicator, alert and
    /// history side effects. A failure is surfaced once and never retried;
    /// re-initiation is up to the user.
    pub async fn submit_file(
        &self,
        payload: Vec<u8>,
        filename: String,
    ) -> Result<DetectionResponse, EngineError> {
        let settings = self.settings.borrow().clone();
        let submission = match Submission::build(payload, filename, &settings) {
            Ok(submission) => submission,
            Err(err) => {
                self.alerts.show(Severity::Warning, err.to_string());
                return Err(err);
            }
        };

        match self.processor.process(submission, false).await {
            Ok(response) => {
                let (severity, message) = alerts::classify(&response);
                self.alerts.show(severity, message);
                self.ledger.borrow_mut().record(&response);
                self.emit_history();
                Ok(response)
            }
            Err(err) => {
                error!("detection request failed: {err}");
                self.alerts
                    .show(Severity::Critical, format!("Detection failed: {err}"));
                Err(err)
            }
        }
    }

    /// Sequential batch run; per-item failures are captured in the outcome.
    pub async fn submit_batch(&self, inputs: Vec<BatchInput>) -> BatchOutcome {
        self.batch.process_batch(inputs).await
    }

    pub fn set_model(&self, model_id: String) {
        self.settings.borrow_mut().model_id = model_id;
    }

    pub fn set_confidence(&self, value: f64) {
        self.settings.borrow_mut().set_confidence(value);
    }

    pub fn set_persist(&self, persist: bool) {
        self.settings.borrow_mut().persist = persist;
    }

    pub fn settings(&self) -> Settings {
        self.settings.borrow().clone()
    }

    pub fn feed_opened(&self) {
        self.realtime.borrow_mut().feed_opened();
    }

    pub fn feed_closed(&self) {
        self.realtime.borrow_mut().feed_closed();
    }

    pub fn set_realtime(&self, enabled: bool) {
        self.realtime.borrow_mut().set_enabled(enabled);
    }

    pub fn realtime_state(&self) -> LoopState {
        self.realtime.borrow().state()
    }

    pub fn recent_history(&self, n: usize) -> Vec<HistoryRecord> {
        self.ledger.borrow().recent(n)
    }

    pub fn dismiss_alert(&self) {
        self.alerts.dismiss();
    }

    /// Host-raised notice (input validation, quota limits) routed through
    /// the same single-alert surface as detection results.
    pub fn notify(&self, severity: Severity, message: impl Into<String>) {
        self.alerts.show(severity, message);
    }

    pub async fn refresh_history(&self) {
        match self.transport.history(HISTORY_CAP).await {
            Ok(entries) => {
                self.ledger.borrow_mut().seed(entries);
                self.emit_history();
            }
            Err(err) => warn!("history refresh failed: {err}"),
        }
    }

    pub async fn refresh_stats(&self) {
        match self.transport.stats().await {
            Ok(stats) => self.presenter.emit(UiUpdate::Stats(stats)),
            Err(err) => warn!("stats unavailable: {err}"),
        }
    }

    fn emit_history(&self) {
        self.presenter
            .emit(UiUpdate::History(self.ledger.borrow().recent(HISTORY_CAP)));
    }

    /// Teardown for hosts that rebuild the engine; drops the push channel.
    pub fn shutdown(&self) {
        self.realtime.borrow_mut().feed_closed();
        if let Some(events) = &self.events {
            events.disconnect();
        }
    }
}
