//! In-memory implementation of the SessionStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tally_core::{HistoryEntry, SessionBlob};

use crate::error::{Result, StoreError};
use crate::traits::SessionStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
    /// When set, every write fails with `WriteRejected`.
    reject_writes: AtomicBool,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Session records by session id.
    sessions: HashMap<String, SessionBlob>,

    /// History mirror, oldest first.
    history: Vec<HistoryEntry>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
            reject_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent writes fail (or succeed again). Reads are unaffected.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected("memory store is read-only".into()));
        }
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemoryStore {
    fn save_session(&self, session_id: &str, blob: &SessionBlob) -> Result<()> {
        let mut inner = self.write()?;
        inner.sessions.insert(session_id.to_string(), blob.clone());
        Ok(())
    }

    fn load_session(&self, session_id: &str) -> Result<Option<SessionBlob>> {
        let inner = self.read()?;
        Ok(inner.sessions.get(session_id).cloned())
    }

    fn append_history(&self, entry: &HistoryEntry) -> Result<()> {
        let mut inner = self.write()?;
        inner.history.push(entry.clone());
        Ok(())
    }

    fn replace_history(&self, entries: &[HistoryEntry]) -> Result<()> {
        let mut inner = self.write()?;
        inner.history = entries.to_vec();
        Ok(())
    }

    fn clear_history(&self) -> Result<()> {
        let mut inner = self.write()?;
        inner.history.clear();
        Ok(())
    }

    fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        let inner = self.read()?;
        Ok(inner.history.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{EntryBuffer, EvalState, Operator, Session};

    #[test]
    fn test_memory_store_session() {
        let store = MemoryStore::new();
        assert_eq!(store.load_session("calculator").unwrap(), None);

        let session = Session::new(
            EvalState::Operand2Entry {
                operand1: 12.5,
                operator: Operator::Multiply,
                operand2: None,
            },
            EntryBuffer::new(),
        );
        let blob = SessionBlob::capture(&session);
        store.save_session("calculator", &blob).unwrap();

        let loaded = store.load_session("calculator").unwrap().unwrap();
        assert_eq!(loaded.restore(), session);
        assert_eq!(store.load_session("other").unwrap(), None);
    }

    #[test]
    fn test_memory_store_history() {
        let store = MemoryStore::new();
        store.append_history(&HistoryEntry::new("1 + 1", "2")).unwrap();
        store.append_history(&HistoryEntry::new("2 + 2", "4")).unwrap();
        assert_eq!(store.load_history().unwrap().len(), 2);

        store
            .replace_history(&[HistoryEntry::new("9 \u{00d7} 9", "81")])
            .unwrap();
        assert_eq!(
            store.load_history().unwrap(),
            vec![HistoryEntry::new("9 \u{00d7} 9", "81")]
        );

        store.clear_history().unwrap();
        assert!(store.load_history().unwrap().is_empty());
    }

    #[test]
    fn test_rejected_writes_leave_data_intact() {
        let store = MemoryStore::new();
        store.append_history(&HistoryEntry::new("1 + 1", "2")).unwrap();

        store.reject_writes(true);
        assert!(matches!(
            store.clear_history(),
            Err(StoreError::WriteRejected(_))
        ));
        assert_eq!(store.load_history().unwrap().len(), 1);

        store.reject_writes(false);
        store.clear_history().unwrap();
        assert!(store.load_history().unwrap().is_empty());
    }
}
