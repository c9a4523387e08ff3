use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use shared::DetectionResponse;

use crate::ports::{BatchProgress, Presenter, UiUpdate};
use crate::processor::Processor;
use crate::settings::Settings;
use crate::submission::Submission;

/// One input file queued for batch analysis.
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub payload: Vec<u8>,
    pub filename: String,
}

#[derive(Debug, Clone)]
pub enum BatchItemOutcome {
    Completed {
        filename: String,
        response: DetectionResponse,
    },
    Failed {
        filename: String,
        error: String,
    },
}

impl BatchItemOutcome {
    pub fn filename(&self) -> &str {
        match self {
            BatchItemOutcome::Completed { filename, .. } => filename,
            BatchItemOutcome::Failed { filename, .. } => filename,
        }
    }
}

/// One entry per input, in submission order, failures included.
pub type BatchOutcome = Vec<BatchItemOutcome>;

/// Sequences N submissions through the single-item processor. Strictly
/// sequential: one outstanding request at a time keeps the per-item progress
/// meaningful and avoids piling load onto the single detection endpoint.
pub struct BatchProcessor {
    processor: Processor,
    presenter: Rc<dyn Presenter>,
    settings: Rc<RefCell<Settings>>,
}

impl BatchProcessor {
    pub fn new(
        processor: Processor,
        presenter: Rc<dyn Presenter>,
        settings: Rc<RefCell<Settings>>,
    ) -> Self {
        Self {
            processor,
            presenter,
            settings,
        }
    }

    /// A failing item is captured in place and the batch moves on; the run
    /// never aborts early. Batch items leave no history records.
    pub async fn process_batch(&self, inputs: Vec<BatchInput>) -> BatchOutcome {
        let total = inputs.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, input) in inputs.into_iter().enumerate() {
            self.presenter
                .emit(UiUpdate::BatchProgress(Some(BatchProgress {
                    index,
                    total,
                    filename: input.filename.clone(),
                })));

            let settings = self.settings.borrow().clone();
            let outcome = match Submission::build(input.payload, input.filename.clone(), &settings)
            {
                Ok(submission) => match self.processor.process(submission, true).await {
                    Ok(response) => BatchItemOutcome::Completed {
                        filename: input.filename,
                        response,
                    },
                    Err(err) => {
                        warn!("batch item {} failed: {err}", input.filename);
                        BatchItemOutcome::Failed {
                            filename: input.filename,
                            error: err.to_string(),
                        }
                    }
                },
                Err(err) => BatchItemOutcome::Failed {
                    filename: input.filename,
                    error: err.to_string(),
                },
            };
            outcomes.push(outcome);
        }

        self.presenter.emit(UiUpdate::BatchProgress(None));
        outcomes
    }
}
