#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Rejected locally before anything is sent to the service.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The detection request could not be completed (transport or decode).
    #[error("detection request failed: {0}")]
    RequestFailed(String),
    /// The push channel could not be established or has dropped.
    #[error("event channel unavailable: {0}")]
    ChannelUnavailable(String),
}
