use std::rc::Rc;

use chrono::Utc;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use shared::DetectionResponse;

use crate::error::EngineError;
use crate::ports::{Presenter, ProgressPhase, ProgressUpdate, Scheduler, TimerHandle, UiUpdate};
use crate::submission::Submission;
use crate::transport::DetectionTransport;

pub const PROGRESS_TICK_MS: u32 = 300;
pub const PROGRESS_CAP: f64 = 90.0;

/// Submits a single item and tracks a simulated progress indicator while
/// waiting. Issues exactly one outbound request and never retries.
#[derive(Clone)]
pub struct Processor {
    transport: Rc<dyn DetectionTransport>,
    scheduler: Rc<dyn Scheduler>,
    presenter: Rc<dyn Presenter>,
}

impl Processor {
    pub fn new(
        transport: Rc<dyn DetectionTransport>,
        scheduler: Rc<dyn Scheduler>,
        presenter: Rc<dyn Presenter>,
    ) -> Self {
        Self {
            transport,
            scheduler,
            presenter,
        }
    }

    /// Quiet mode suppresses the progress indicator; the caller owns any
    /// alerting or history side effects either way.
    pub async fn process(
        &self,
        submission: Submission,
        quiet: bool,
    ) -> Result<DetectionResponse, EngineError> {
        let id = submission.id;
        debug!("submitting {} ({})", submission.filename, id);

        // Guard drops on every exit path below, tearing the indicator down
        // whether the request succeeds, fails or decodes garbage.
        let _progress = (!quiet).then(|| ProgressGuard::start(&self.scheduler, &self.presenter));

        let response = self.transport.detect(submission).await?;
        if !response.success {
            let reason = response
                .message
                .unwrap_or_else(|| "service reported failure".to_string());
            return Err(EngineError::RequestFailed(reason));
        }
        Ok(response)
    }
}

/// Periodically advances a displayed percentage by a random increment while
/// a request is in flight, capped below completion. Purely cosmetic: it
/// exists to keep feedback moving during a request of unknown duration.
struct ProgressGuard {
    timer: TimerHandle,
    presenter: Rc<dyn Presenter>,
}

impl ProgressGuard {
    fn start(scheduler: &Rc<dyn Scheduler>, presenter: &Rc<dyn Presenter>) -> Self {
        presenter.emit(UiUpdate::Progress(Some(ProgressUpdate {
            percent: 0.0,
            phase: ProgressPhase::Initializing,
        })));

        let tick_presenter = presenter.clone();
        let mut rng = SmallRng::seed_from_u64(Utc::now().timestamp_millis() as u64);
        let mut percent = 0.0_f64;
        let timer = scheduler.repeating(
            PROGRESS_TICK_MS,
            Box::new(move || {
                percent = (percent + rng.random_range(4.0..18.0)).min(PROGRESS_CAP);
                tick_presenter.emit(UiUpdate::Progress(Some(ProgressUpdate {
                    percent,
                    phase: ProgressPhase::for_percent(percent),
                })));
            }),
        );

        Self {
            timer,
            presenter: presenter.clone(),
        }
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.timer.cancel();
        self.presenter.emit(UiUpdate::Progress(None));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::{LocalPool, block_on};
    use futures::task::LocalSpawnExt;

    use super::*;
    use crate::settings::Settings;
    use crate::testkit::{ManualTransport, RecordingPresenter, VirtualScheduler, response};

    fn submission() -> Submission {
        Submission::build(vec![0xAB; 16], "test.jpg", &Settings::default()).unwrap()
    }

    #[test]
    fn phase_thresholds() {
        assert_eq!(ProgressPhase::for_percent(0.0), ProgressPhase::Initializing);
        assert_eq!(ProgressPhase::for_percent(29.9), ProgressPhase::Initializing);
        assert_eq!(ProgressPhase::for_percent(30.0), ProgressPhase::Processing);
        assert_eq!(ProgressPhase::for_percent(59.9), ProgressPhase::Processing);
        assert_eq!(ProgressPhase::for_percent(60.0), ProgressPhase::Analyzing);
        assert_eq!(ProgressPhase::for_percent(89.9), ProgressPhase::Analyzing);
        assert_eq!(ProgressPhase::for_percent(90.0), ProgressPhase::Finalizing);
    }

    #[test]
    fn progress_ticks_then_clears_on_success() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let presenter = Rc::new(RecordingPresenter::default());
        let transport = Rc::new(ManualTransport::default());
        let processor = Processor::new(transport.clone(), scheduler.clone(), presenter.clone());

        let mut pool = LocalPool::new();
        let result = Rc::new(RefCell::new(None));
        let slot = result.clone();
        let sub = submission();
        pool.spawner()
            .spawn_local(async move {
                *slot.borrow_mut() = Some(processor.process(sub, false).await);
            })
            .unwrap();
        pool.run_until_stalled();

        scheduler.advance(PROGRESS_TICK_MS as u64 * 3);
        let updates = presenter.progress_updates();
        // initial 0% plus three ticks, all monotonically non-decreasing
        assert_eq!(updates.len(), 4);
        assert!(updates.windows(2).all(|w| w[0].percent <= w[1].percent));
        assert!(updates.iter().all(|u| u.percent <= PROGRESS_CAP));

        transport.resolve(Ok(response(0, 0, 0)));
        pool.run_until_stalled();

        assert!(result.borrow().as_ref().unwrap().is_ok());
        assert!(presenter.progress_cleared());
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn progress_caps_at_ninety_percent() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let presenter = Rc::new(RecordingPresenter::default());
        let transport = Rc::new(ManualTransport::default());
        let processor = Processor::new(transport.clone(), scheduler.clone(), presenter.clone());

        let mut pool = LocalPool::new();
        let sub = submission();
        pool.spawner()
            .spawn_local(async move {
                let _ = processor.process(sub, false).await;
            })
            .unwrap();
        pool.run_until_stalled();

        scheduler.advance(PROGRESS_TICK_MS as u64 * 40);
        let updates = presenter.progress_updates();
        let last = updates.last().unwrap();
        assert_eq!(last.percent, PROGRESS_CAP);
        assert_eq!(last.phase, ProgressPhase::Finalizing);

        transport.resolve(Ok(response(0, 0, 0)));
        pool.run_until_stalled();
    }

    #[test]
    fn progress_clears_on_failure_too() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let presenter = Rc::new(RecordingPresenter::default());
        let transport = Rc::new(ManualTransport::default());
        let processor = Processor::new(transport.clone(), scheduler.clone(), presenter.clone());

        let mut pool = LocalPool::new();
        let result = Rc::new(RefCell::new(None));
        let slot = result.clone();
        let sub = submission();
        pool.spawner()
            .spawn_local(async move {
                *slot.borrow_mut() = Some(processor.process(sub, false).await);
            })
            .unwrap();
        pool.run_until_stalled();
        scheduler.advance(PROGRESS_TICK_MS as u64);

        transport.resolve(Err(EngineError::RequestFailed("connection reset".into())));
        pool.run_until_stalled();

        assert!(result.borrow().as_ref().unwrap().is_err());
        assert!(presenter.progress_cleared());
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn quiet_mode_emits_no_progress() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let presenter = Rc::new(RecordingPresenter::default());
        let transport = Rc::new(ManualTransport::default());
        let processor = Processor::new(transport.clone(), scheduler.clone(), presenter.clone());

        let mut pool = LocalPool::new();
        let sub = submission();
        pool.spawner()
            .spawn_local(async move {
                let _ = processor.process(sub, true).await;
            })
            .unwrap();
        pool.run_until_stalled();
        scheduler.advance(PROGRESS_TICK_MS as u64 * 5);
        transport.resolve(Ok(response(1, 0, 0)));
        pool.run_until_stalled();

        assert!(presenter.progress_updates().is_empty());
        assert!(!presenter.progress_cleared());
    }

    #[test]
    fn unsuccessful_response_maps_to_request_failed() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let presenter = Rc::new(RecordingPresenter::default());
        let transport = Rc::new(ManualTransport::default());
        let processor = Processor::new(transport.clone(), scheduler.clone(), presenter.clone());

        let mut failed = response(0, 0, 0);
        failed.success = false;
        failed.message = Some("Unsupported file format".into());
        transport.resolve(Ok(failed));

        let err = block_on(processor.process(submission(), true)).unwrap_err();
        match err {
            EngineError::RequestFailed(reason) => {
                assert!(reason.contains("Unsupported file format"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
