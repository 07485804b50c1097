//! SQLite implementation of the SessionStore trait.
//!
//! This is the primary storage backend for Tally. It uses rusqlite with
//! bundled SQLite behind a mutex; every call completes its write before
//! returning.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection};

use tally_core::{HistoryEntry, SessionBlob};

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::SessionStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Poisoned(format!("mutex poisoned: {}", e)))
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Execute a blocking operation that needs mutable access.
    fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.lock()?;
        f(&mut conn)
    }
}

fn insert_history(conn: &Connection, entry: &HistoryEntry, now: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO history (expression, result, recorded_at) VALUES (?1, ?2, ?3)",
        params![entry.expression(), entry.result(), now],
    )?;
    Ok(())
}

impl SessionStore for SqliteStore {
    fn save_session(&self, session_id: &str, blob: &SessionBlob) -> Result<()> {
        self.with_conn_mut(|conn| {
            let now = now_millis();
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO session_fields (session_id, field, value, updated_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(session_id, field)
                     DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                )?;
                for (field, value) in blob.to_fields() {
                    stmt.execute(params![session_id, field, value, now])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    fn load_session(&self, session_id: &str) -> Result<Option<SessionBlob>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare_cached("SELECT field, value FROM session_fields WHERE session_id = ?1")?;
            let rows = stmt
                .query_map(params![session_id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            if rows.is_empty() {
                return Ok(None);
            }
            Ok(Some(SessionBlob::from_fields(
                rows.iter().map(|(field, value)| (field.as_str(), value.clone())),
            )))
        })
    }

    fn append_history(&self, entry: &HistoryEntry) -> Result<()> {
        self.with_conn(|conn| insert_history(conn, entry, now_millis()))
    }

    fn replace_history(&self, entries: &[HistoryEntry]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let now = now_millis();
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM history", [])?;
            for entry in entries {
                insert_history(&tx, entry, now)?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    fn clear_history(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM history", [])?;
            Ok(())
        })
    }

    fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare_cached("SELECT expression, result FROM history ORDER BY position")?;
            let entries = stmt
                .query_map([], |row| {
                    Ok(HistoryEntry::new(
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(entries)
        })
    }
}
