use reqwest::StatusCode;
use store::StoreError;
use thiserror::Error;

/// Every way a remote operation can fail. The `Display` text is what callers
/// show to the user; no further distinction is surfaced.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Failed to update local cache: {0}")]
    Store(#[from] StoreError),
}

impl FetchError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// The server rejected the session token (or there was none). The client
    /// never checks token validity itself, so this is the only signal that a
    /// session has expired or been revoked.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
