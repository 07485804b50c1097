//! Error types for the calculator facade.

use tally_store::StoreError;
use tally_sync::SyncError;
use thiserror::Error;

/// Errors that can occur while setting up a [`Calculator`](crate::Calculator).
///
/// Once a calculator is running nothing it does is fallible: storage and
/// remote failures become [`Notice`](crate::Notice)s instead.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Remote configuration or transport error.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, TallyError>;
