//! Boundary to the remote detection service: one request/response call per
//! submission, plus a best-effort push channel for server-side events.

use futures::future::LocalBoxFuture;
use shared::{DetectionResponse, DetectionStats, HistoryEntry, ModelInfo, PushEvent};

use crate::error::EngineError;
use crate::submission::Submission;

pub type TransportFuture<T> = LocalBoxFuture<'static, Result<T, EngineError>>;

/// Request/response side of the service. Each call is stateless from the
/// server's point of view, so callers may overlap freely.
pub trait DetectionTransport {
    /// Submits one item for detection. Exactly one outbound request; the
    /// engine never retries on its own.
    fn detect(&self, submission: Submission) -> TransportFuture<DetectionResponse>;
    /// Lists the models the service currently has loaded.
    fn models(&self) -> TransportFuture<Vec<ModelInfo>>;
    /// Fetches up to `limit` past detections, most-recent-first.
    fn history(&self, limit: usize) -> TransportFuture<Vec<HistoryEntry>>;
    /// Fetches aggregate detection statistics.
    fn stats(&self) -> TransportFuture<DetectionStats>;
}

/// Push-style event feed. Connecting is best-effort: when the channel cannot
/// be established the engine keeps working over plain requests, so `connect`
/// failures must never be escalated beyond a log line.
pub trait EventSource {
    fn connect(&self, sink: Box<dyn Fn(PushEvent)>) -> Result<(), EngineError>;
    fn disconnect(&self);
}
