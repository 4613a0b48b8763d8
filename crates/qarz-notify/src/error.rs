//! Error types for channel delivery

use qarz_core::Channel;

/// Notification error type
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Gateway error: {0}")]
    GatewayError(String),

    #[error("{0} destination not configured")]
    DestinationMissing(Channel),

    #[error("no sender registered for channel {0}")]
    NoSender(Channel),

    #[error("send timed out after {0}s")]
    Timeout(u64),

    #[error("sender aborted: {0}")]
    SenderAborted(String),

    #[error(transparent)]
    Core(#[from] qarz_core::Error),
}

/// Result type alias for notification operations
pub type Result<T> = std::result::Result<T, NotifyError>;

impl NotifyError {
    pub fn gateway<S: Into<String>>(msg: S) -> Self {
        NotifyError::GatewayError(msg.into())
    }
}
