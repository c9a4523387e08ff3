use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum_macros::{Display as StrumDisplay, EnumString};

/// Severity label assigned by the detection service. The client consumes it
/// as an opaque ranking and never recomputes it from raw counts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumString,
)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[display(fmt = "image")]
    Image,
    #[display(fmt = "video")]
    Video,
}

/// Response body of the `/detect` endpoint. Fields the service omits on
/// failure paths all default so a bare `{"success": false, "message": ...}`
/// still decodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub success: bool,
    #[serde(default)]
    pub detection_count: u32,
    #[serde(default)]
    pub fire_count: u32,
    #[serde(default)]
    pub smoke_count: u32,
    #[serde(default)]
    pub max_confidence: Option<f64>,
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub uploaded_file: Option<String>,
    #[serde(default)]
    pub processed_file: Option<String>,
    #[serde(default)]
    pub file_type: Option<MediaKind>,
    #[serde(default)]
    pub message: Option<String>,
}

impl DetectionResponse {
    /// The service guarantees fire + smoke never exceeds the total count.
    pub fn counts_consistent(&self) -> bool {
        self.fire_count + self.smoke_count <= self.detection_count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub loaded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

/// One record from the `/api/history` endpoint. The service stores richer
/// records than the client ledger keeps; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub model_used: Option<String>,
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub confidence_threshold: Option<f64>,
    #[serde(default)]
    pub detection_count: u32,
    #[serde(default)]
    pub fire_count: u32,
    #[serde(default)]
    pub smoke_count: u32,
    #[serde(default)]
    pub max_confidence: Option<f64>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub file_type: Option<MediaKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskLevelCounts {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

/// Aggregate statistics from `/api/stats`. The endpoint returns an empty
/// object when no detections have been recorded yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionStats {
    pub total_detections: u32,
    pub fire_detections: u32,
    pub smoke_detections: u32,
    pub avg_processing_time: f64,
    pub risk_levels: RiskLevelCounts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsResponse {
    pub stats: DetectionStats,
}

/// Event frame delivered over the push channel. Only `detection_update`
/// is acted on; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

impl PushEvent {
    pub const DETECTION_UPDATE: &'static str = "detection_update";
}
