pub const DEFAULT_MODEL: &str = "yolov8n";
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// User-tunable detection settings. Read as a snapshot when a submission is
/// built; no history of past values is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model_id: String,
    pub confidence_threshold: f64,
    pub persist: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL.to_string(),
            confidence_threshold: DEFAULT_CONFIDENCE,
            persist: false,
        }
    }
}

impl Settings {
    /// The settings control owns range validation; anything downstream of
    /// this setter may assume the threshold is within [0, 1].
    pub fn set_confidence(&mut self, value: f64) {
        self.confidence_threshold = value.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped_to_unit_interval() {
        let mut settings = Settings::default();
        settings.set_confidence(1.7);
        assert_eq!(settings.confidence_threshold, 1.0);
        settings.set_confidence(-0.3);
        assert_eq!(settings.confidence_threshold, 0.0);
        settings.set_confidence(0.42);
        assert_eq!(settings.confidence_threshold, 0.42);
    }

    #[test]
    fn defaults_match_service_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.model_id, "yolov8n");
        assert_eq!(settings.confidence_threshold, 0.5);
        assert!(!settings.persist);
    }
}
