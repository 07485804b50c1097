//! # Tally Sync
//!
//! The remote history mirror: a best-effort copy of the calculation history
//! kept on a remote store.
//!
//! ## Overview
//!
//! The remote is reached through the [`HistoryRemote`] trait, which has
//! exactly three operations: fetch everything, append one item, delete
//! everything. Implementations:
//!
//! - [`HttpRemote`] - REST client (`GET`/`POST`/`DELETE {base}/history`)
//! - [`MemoryRemote`] - In-process remote for tests, with scriptable
//!   failures and a pause switch for holding completions back
//!
//! ## Failure model
//!
//! Every failure (transport, non-2xx status, malformed body, timeout) is a
//! [`SyncError`]. Callers treat all of them the same way: the remote is
//! unavailable, local state stays as it is, nothing is retried.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tally_sync::{HistoryItem, HistoryRemote, HttpRemote, SyncConfig};
//!
//! async fn example() -> tally_sync::Result<()> {
//!     let remote = HttpRemote::new(&SyncConfig::default())?;
//!     let stored = remote.append(&HistoryItem::new("3 + 4", "7")).await?;
//!     let everything = remote.fetch_all().await?;
//!     assert!(everything.contains(&stored));
//!     remote.clear_all().await
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod item;
pub mod remote;

pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use http::HttpRemote;
pub use item::HistoryItem;
pub use remote::{memory::MemoryRemote, HistoryRemote};
