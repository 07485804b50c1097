//! # Tally Store
//!
//! Durable persistence for Tally: the calculator session and the local
//! history mirror.
//!
//! ## Overview
//!
//! Persistence sits behind the [`SessionStore`] trait so the calculator is
//! storage-agnostic. The primary implementation is [`SqliteStore`], with
//! [`MemoryStore`] for tests.
//!
//! ## Key Types
//!
//! - [`SessionStore`] - The trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tally_core::{Session, SessionBlob};
//! use tally_store::{SessionStore, SqliteStore};
//!
//! let store = SqliteStore::open("tally.db").unwrap();
//! store
//!     .save_session("calculator", &SessionBlob::capture(&Session::default()))
//!     .unwrap();
//! let restored = store.load_session("calculator").unwrap();
//! assert!(restored.is_some());
//! ```
//!
//! ## Design Notes
//!
//! - **Synchronous writes**: a save returns once the record is durable, so
//!   the caller can persist after every transition without losing ordering.
//! - **Idempotent saves**: saving overwrites the previous record field by field.
//! - **Structured history**: history is a table of `(expression, result)`
//!   rows in append order, not a delimiter-joined string.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::SessionStore;
