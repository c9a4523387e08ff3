use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info};

use crate::error::EngineError;
use crate::ports::{
    FrameSource, LiveAlert, Presenter, Scheduler, Spawner, TimerHandle, UiUpdate,
};
use crate::processor::Processor;
use crate::settings::Settings;
use crate::submission::Submission;

pub const REALTIME_PERIOD_MS: u32 = 2000;
pub const LIVE_ALERT_MS: u32 = 2000;

/// Lifecycle of the live monitoring loop. `Armed` is the transient stretch
/// between the toggle flipping on and the timer being installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Armed,
    Running,
}

#[derive(Default)]
struct TickShared {
    /// Guards against overlapping ticks when a request outlives the period.
    in_flight: Cell<bool>,
    clear_timer: RefCell<Option<TimerHandle>>,
}

#[derive(Clone)]
struct TickContext {
    processor: Processor,
    frames: Rc<dyn FrameSource>,
    settings: Rc<RefCell<Settings>>,
    presenter: Rc<dyn Presenter>,
    scheduler: Rc<dyn Scheduler>,
    shared: Rc<TickShared>,
}

/// Cancellable periodic task that captures a frame from the live feed,
/// submits it quietly and raises a visual alert only when something was
/// detected. Zero-detection ticks stay silent by design: continuous
/// monitoring must not nag.
pub struct RealtimeMonitor {
    ctx: TickContext,
    spawner: Rc<dyn Spawner>,
    enabled: bool,
    feed_open: bool,
    timer: Option<TimerHandle>,
}

impl RealtimeMonitor {
    pub fn new(
        processor: Processor,
        frames: Rc<dyn FrameSource>,
        settings: Rc<RefCell<Settings>>,
        scheduler: Rc<dyn Scheduler>,
        spawner: Rc<dyn Spawner>,
        presenter: Rc<dyn Presenter>,
    ) -> Self {
        Self {
            ctx: TickContext {
                processor,
                frames,
                settings,
                presenter,
                scheduler,
                shared: Rc::new(TickShared::default()),
            },
            spawner,
            enabled: false,
            feed_open: false,
            timer: None,
        }
    }

    pub fn state(&self) -> LoopState {
        if self.timer.is_some() {
            LoopState::Running
        } else if self.enabled && self.feed_open {
            LoopState::Armed
        } else {
            LoopState::Idle
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            if self.feed_open {
                self.start();
            }
        } else {
            self.stop();
        }
    }

    pub fn feed_opened(&mut self) {
        self.feed_open = true;
        if self.enabled {
            self.start();
        }
    }

    /// Stopping the feed always stops the loop, even when the toggle state
    /// is never separately reset.
    pub fn feed_closed(&mut self) {
        self.feed_open = false;
        self.stop();
    }

    fn start(&mut self) {
        // re-arming while already running is a no-op
        if self.timer.is_some() {
            return;
        }
        info!("realtime monitoring started");
        let ctx = self.ctx.clone();
        let spawner = self.spawner.clone();
        self.timer = Some(self.ctx.scheduler.repeating(
            REALTIME_PERIOD_MS,
            Box::new(move || Self::tick(&ctx, &spawner)),
        ));
    }

    fn stop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
            info!("realtime monitoring stopped");
        }
        if let Some(mut clear) = self.ctx.shared.clear_timer.borrow_mut().take() {
            clear.cancel();
            self.ctx.presenter.emit(UiUpdate::LiveAlert(None));
        }
    }

    fn tick(ctx: &TickContext, spawner: &Rc<dyn Spawner>) {
        if ctx.shared.in_flight.get() {
            debug!("skipping realtime tick, previous request still in flight");
            return;
        }
        ctx.shared.in_flight.set(true);
        let ctx = ctx.clone();
        spawner.spawn(Box::pin(async move {
            // A dropped frame is not actionable; log it and keep the loop
            // alive for the next tick.
            if let Err(err) = Self::run_tick(&ctx).await {
                debug!("realtime tick dropped: {err}");
            }
            ctx.shared.in_flight.set(false);
        }));
    }

    async fn run_tick(ctx: &TickContext) -> Result<(), EngineError> {
        let frame = ctx.frames.capture().await?;
        let settings = ctx.settings.borrow().clone();
        let submission = Submission::build(frame.bytes, frame.filename, &settings)?;
        let response = ctx.processor.process(submission, true).await?;

        if response.detection_count > 0 {
            let fire = response.fire_count > 0;
            ctx.presenter.emit(UiUpdate::LiveAlert(Some(LiveAlert {
                fire,
                audio: true,
            })));

            let presenter = ctx.presenter.clone();
            let shared = ctx.shared.clone();
            let clear = ctx.scheduler.once(
                LIVE_ALERT_MS,
                Box::new(move || {
                    presenter.emit(UiUpdate::LiveAlert(None));
                    shared.clear_timer.borrow_mut().take();
                }),
            );
            // a fresh detection restarts the emphasis window
            if let Some(mut previous) = ctx.shared.clear_timer.borrow_mut().replace(clear) {
                previous.cancel();
            }
        }
        Ok(())
    }
}
