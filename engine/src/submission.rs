use uuid::Uuid;

use crate::error::EngineError;
use crate::settings::Settings;

/// One packaged detection request: a media blob plus the settings snapshot
/// taken when it was built. Immutable once built, owned by the processor
/// that submits it and discarded when the request completes.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub payload: Vec<u8>,
    pub filename: String,
    pub settings: Settings,
}

impl Submission {
    /// Packages a blob with the current settings. Empty blobs are rejected
    /// here so they never reach the wire. The confidence value is embedded
    /// exactly as given; range validation happened at the settings control.
    pub fn build(
        payload: Vec<u8>,
        filename: impl Into<String>,
        settings: &Settings,
    ) -> Result<Self, EngineError> {
        let filename = filename.into();
        if payload.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "{filename}: file is empty"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            payload,
            filename,
            settings: settings.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_payload() {
        let err = Submission::build(Vec::new(), "empty.jpg", &Settings::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn embeds_confidence_unmodified() {
        for confidence in [0.0, 0.25, 0.333, 0.5, 0.75, 1.0] {
            let mut settings = Settings::default();
            settings.set_confidence(confidence);
            let submission =
                Submission::build(vec![0xFF; 8], "frame.jpg", &settings).unwrap();
            assert_eq!(submission.settings.confidence_threshold, confidence);
        }
    }

    #[test]
    fn snapshots_settings_at_build_time() {
        let mut settings = Settings::default();
        let submission = Submission::build(vec![1, 2, 3], "a.png", &settings).unwrap();
        settings.model_id = "best".into();
        assert_eq!(submission.settings.model_id, "yolov8n");
    }
}
