//! Advisory notifications for the presentation layer.

use std::fmt;

/// Which remote operation a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    Append,
    Refresh,
    Clear,
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncOperation::Append => "save history",
            SyncOperation::Refresh => "load history",
            SyncOperation::Clear => "clear history",
        };
        f.write_str(name)
    }
}

/// A non-blocking notification. Nothing here ever rolls back local state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A remote history operation failed. Local history is unchanged.
    SyncUnavailable {
        operation: SyncOperation,
        reason: String,
    },

    /// A durable write failed. The in-memory state went ahead regardless.
    PersistenceFailed { reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::SyncUnavailable { operation, reason } => {
                write!(f, "could not {}: {}", operation, reason)
            }
            Notice::PersistenceFailed { reason } => write!(f, "could not save: {}", reason),
        }
    }
}
