use chrono::Utc;
use serde::Serialize;
use shared::{DetectionResponse, HistoryEntry, RiskLevel};

/// Upper bound on the in-memory ledger. Older entries are dropped, never
/// archived locally; the remote store is the system of record.
pub const HISTORY_CAP: usize = 50;

/// Projection of a detection result kept for display. Most-recent-first
/// order is the invariant every reader relies on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub timestamp: String,
    pub detection_count: u32,
    pub risk_level: RiskLevel,
    pub processing_time: Option<f64>,
}

impl HistoryRecord {
    fn from_entry(entry: HistoryEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            detection_count: entry.detection_count,
            risk_level: entry.risk_level,
            processing_time: entry.processing_time,
        }
    }

    fn from_response(response: &DetectionResponse) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            detection_count: response.detection_count,
            risk_level: response.risk_level,
            processing_time: response.processing_time,
        }
    }
}

/// Insertion-ordered, size-bounded record of recent detections.
#[derive(Debug, Default)]
pub struct HistoryLedger {
    records: Vec<HistoryRecord>,
}

impl HistoryLedger {
    /// Replaces the ledger with records fetched from the remote endpoint,
    /// expected most-recent-first.
    pub fn seed(&mut self, entries: Vec<HistoryEntry>) {
        self.records = entries
            .into_iter()
            .take(HISTORY_CAP)
            .map(HistoryRecord::from_entry)
            .collect();
    }

    /// Prepends a projection of a successful result, then truncates. The
    /// prepend and the truncate are distinct steps so ordering holds even if
    /// calls ever overlap.
    pub fn record(&mut self, response: &DetectionResponse) -> HistoryRecord {
        let record = HistoryRecord::from_response(response);
        self.records.insert(0, record.clone());
        self.records.truncate(HISTORY_CAP);
        record
    }

    /// Pure read of the `n` most recent records.
    pub fn recent(&self, n: usize) -> Vec<HistoryRecord> {
        self.records.iter().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
