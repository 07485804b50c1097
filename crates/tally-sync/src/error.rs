//! Error types for the sync module.

use thiserror::Error;

/// Errors that can occur talking to the remote history store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote answered with a non-success status.
    #[error("remote returned status {code}")]
    Status { code: u16 },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The request did not complete in time.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The remote cannot be reached at all (offline, no runtime, scripted outage).
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::Timeout(e.to_string())
        } else if e.is_decode() {
            SyncError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            SyncError::Status {
                code: status.as_u16(),
            }
        } else {
            SyncError::Transport(e.to_string())
        }
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
