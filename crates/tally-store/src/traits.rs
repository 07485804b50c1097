//! SessionStore trait: the abstract interface for calculator persistence.
//!
//! This trait allows the calculator to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use tally_core::{HistoryEntry, SessionBlob};

use crate::error::Result;

/// Durable storage for the calculator session and the local history mirror.
///
/// All methods are synchronous: they run on the thread that owns the
/// calculator and return once the write is durable.
pub trait SessionStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    /// Save the session record, overwriting any previous one.
    fn save_session(&self, session_id: &str, blob: &SessionBlob) -> Result<()>;

    /// Load the session record, or `None` if none was ever saved.
    ///
    /// Field contents are returned raw; decoding (and degrading corrupt
    /// fields) is up to the caller.
    fn load_session(&self, session_id: &str) -> Result<Option<SessionBlob>>;

    // ─────────────────────────────────────────────────────────────────────────
    // History mirror
    // ─────────────────────────────────────────────────────────────────────────

    /// Append one entry after all existing entries.
    fn append_history(&self, entry: &HistoryEntry) -> Result<()>;

    /// Replace the whole history with `entries`, in order.
    fn replace_history(&self, entries: &[HistoryEntry]) -> Result<()>;

    /// Remove all history entries.
    fn clear_history(&self) -> Result<()>;

    /// Load all history entries, oldest first.
    fn load_history(&self) -> Result<Vec<HistoryEntry>>;
}

impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    fn save_session(&self, session_id: &str, blob: &SessionBlob) -> Result<()> {
        (**self).save_session(session_id, blob)
    }

    fn load_session(&self, session_id: &str) -> Result<Option<SessionBlob>> {
        (**self).load_session(session_id)
    }

    fn append_history(&self, entry: &HistoryEntry) -> Result<()> {
        (**self).append_history(entry)
    }

    fn replace_history(&self, entries: &[HistoryEntry]) -> Result<()> {
        (**self).replace_history(entries)
    }

    fn clear_history(&self) -> Result<()> {
        (**self).clear_history()
    }

    fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        (**self).load_history()
    }
}
