use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use shared::DetectionResponse;

use crate::ports::{AlertView, Presenter, Scheduler, Severity, TimerHandle, UiUpdate};

pub const ALERT_DURATION_MS: u32 = 5000;

/// Maps a detection result to an alert severity and message. Fire dominates
/// smoke when both are present. The service guarantees the per-class counts
/// never exceed the total; a response that breaks that is logged and then
/// classified off the per-class counts anyway, since fire dominance does not
/// depend on the total.
pub fn classify(response: &DetectionResponse) -> (Severity, String) {
    if !response.counts_consistent() {
        warn!(
            "inconsistent detection counts: fire {} + smoke {} > total {}",
            response.fire_count, response.smoke_count, response.detection_count
        );
    }
    if response.fire_count > 0 {
        (
            Severity::Critical,
            format!(
                "FIRE DETECTED! {} fire detection(s) found!",
                response.fire_count
            ),
        )
    } else if response.smoke_count > 0 {
        (
            Severity::Warning,
            format!(
                "SMOKE DETECTED! {} smoke detection(s) found!",
                response.smoke_count
            ),
        )
    } else if response.detection_count > 0 {
        (
            Severity::Warning,
            format!("{} detection(s) found!", response.detection_count),
        )
    } else {
        (Severity::Success, "No fire or smoke detected.".to_string())
    }
}

#[derive(Default)]
struct AlertState {
    /// Monotonic id of the alert currently on screen. A pending dismiss
    /// timer only clears the surface if its alert still owns it.
    current: u64,
    timer: Option<TimerHandle>,
}

/// Renders at most one notification at a time. Showing a new alert discards
/// the current one; superseding beats stacking for transient messages.
pub struct AlertDispatcher {
    scheduler: Rc<dyn Scheduler>,
    presenter: Rc<dyn Presenter>,
    state: Rc<RefCell<AlertState>>,
}

impl AlertDispatcher {
    pub fn new(scheduler: Rc<dyn Scheduler>, presenter: Rc<dyn Presenter>) -> Self {
        Self {
            scheduler,
            presenter,
            state: Rc::new(RefCell::new(AlertState::default())),
        }
    }

    pub fn show(&self, severity: Severity, message: impl Into<String>) {
        self.show_for(severity, message, ALERT_DURATION_MS);
    }

    pub fn show_for(&self, severity: Severity, message: impl Into<String>, duration_ms: u32) {
        let message = message.into();
        let mut state = self.state.borrow_mut();
        if let Some(mut timer) = state.timer.take() {
            timer.cancel();
        }
        state.current += 1;
        let id = state.current;

        self.presenter.emit(UiUpdate::Alert(Some(AlertView {
            severity,
            message,
            duration_ms,
        })));

        let presenter = self.presenter.clone();
        let shared = self.state.clone();
        state.timer = Some(self.scheduler.once(
            duration_ms,
            Box::new(move || {
                let mut state = shared.borrow_mut();
                if state.current == id {
                    state.timer = None;
                    presenter.emit(UiUpdate::Alert(None));
                }
            }),
        ));
    }

    /// Manual close. Always available; cancels the pending auto-dismiss.
    pub fn dismiss(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(mut timer) = state.timer.take() {
            timer.cancel();
        }
        state.current += 1;
        self.presenter.emit(UiUpdate::Alert(None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{RecordingPresenter, VirtualScheduler, response};

    fn dispatcher() -> (AlertDispatcher, Rc<VirtualScheduler>, Rc<RecordingPresenter>) {
        let scheduler = Rc::new(VirtualScheduler::new());
        let presenter = Rc::new(RecordingPresenter::default());
        let dispatcher = AlertDispatcher::new(scheduler.clone(), presenter.clone());
        (dispatcher, scheduler, presenter)
    }

    #[test]
    fn classifies_fire_over_smoke() {
        let (severity, message) = classify(&response(3, 1, 2));
        assert_eq!(severity, Severity::Critical);
        assert!(message.contains("FIRE"));
    }

    #[test]
    fn classifies_smoke_without_fire_as_warning() {
        let (severity, message) = classify(&response(2, 0, 2));
        assert_eq!(severity, Severity::Warning);
        assert!(message.contains("SMOKE"));
    }

    #[test]
    fn classifies_generic_detections_as_warning() {
        let (severity, _) = classify(&response(4, 0, 0));
        assert_eq!(severity, Severity::Warning);
    }

    #[test]
    fn inconsistent_counts_still_classify_fire_first() {
        // fire + smoke exceeding the total violates the service's contract
        // but must not derail classification
        let broken = response(1, 2, 2);
        assert!(!broken.counts_consistent());
        let (severity, message) = classify(&broken);
        assert_eq!(severity, Severity::Critical);
        assert!(message.contains("2 fire"));
    }

    #[test]
    fn classifies_empty_result_as_success() {
        let (severity, message) = classify(&response(0, 0, 0));
        assert_eq!(severity, Severity::Success);
        assert!(message.contains("No fire or smoke"));
    }

    #[test]
    fn auto_dismisses_after_duration() {
        let (dispatcher, scheduler, presenter) = dispatcher();
        dispatcher.show(Severity::Info, "hello");
        assert!(presenter.visible_alert().is_some());
        scheduler.advance(ALERT_DURATION_MS as u64);
        assert!(presenter.visible_alert().is_none());
    }

    #[test]
    fn second_alert_supersedes_and_outlives_first_timer() {
        let (dispatcher, scheduler, presenter) = dispatcher();
        dispatcher.show(Severity::Warning, "first");
        scheduler.advance(1000);
        dispatcher.show(Severity::Critical, "second");

        // past the first alert's would-be expiry, the second must survive
        scheduler.advance(4500);
        let visible = presenter.visible_alert().expect("second alert visible");
        assert_eq!(visible.message, "second");
        assert_eq!(visible.severity, Severity::Critical);

        // and the second still expires on its own schedule
        scheduler.advance(1000);
        assert!(presenter.visible_alert().is_none());
    }

    #[test]
    fn manual_dismiss_cancels_pending_timer() {
        let (dispatcher, scheduler, presenter) = dispatcher();
        dispatcher.show(Severity::Success, "done");
        dispatcher.dismiss();
        assert!(presenter.visible_alert().is_none());

        let clears_before = presenter.count_alert_clears();
        scheduler.advance(ALERT_DURATION_MS as u64 * 2);
        assert_eq!(presenter.count_alert_clears(), clears_before);
    }
}
