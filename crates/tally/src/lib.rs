//! # Tally
//!
//! A calculator-style evaluator with a persisted session and a history list
//! mirrored to a remote store.
//!
//! ## Overview
//!
//! - **Evaluation**: strictly left to right, two operands at a time. `3 + 4 + 2 =`
//!   computes `3 + 4 = 7`, then `7 + 2 = 9`.
//! - **Session**: saved after every key, restored on open. Corrupt fields
//!   fall back to their defaults one by one.
//! - **History**: recorded locally first and shown at once. The remote is a
//!   best-effort mirror: one append attempt per entry, full replacement only
//!   on an explicit refresh.
//! - **Failures**: nothing the store or the remote does can fail a key press.
//!   Problems are reported as [`Notice`]s.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tally::{Calculator, CalculatorConfig, Key};
//! use tally::store::SqliteStore;
//! use tally::sync::{HistoryRemote, HttpRemote, SyncConfig};
//!
//! async fn example() -> tally::Result<()> {
//!     let store = SqliteStore::open("tally.db")?;
//!     let remote = HttpRemote::new(&SyncConfig::default())?;
//!     let mut calc = Calculator::open(
//!         store,
//!         Some(Arc::new(remote) as Arc<dyn HistoryRemote>),
//!         CalculatorConfig::default(),
//!     );
//!
//!     calc.refresh_history();
//!     for key in ["1", "2", "\u{00d7}", "3", "="] {
//!         calc.press(key.parse::<Key>().expect("keypad token"));
//!     }
//!     assert_eq!(calc.render().input, "36");
//!
//!     // Later, on the owning task: fold remote results back in.
//!     calc.settle().await;
//!     for notice in calc.drain_notices() {
//!         eprintln!("{}", notice);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `tally::core` - Keys, the entry buffer and the evaluation state machine
//! - `tally::store` - Session persistence and the local history mirror
//! - `tally::sync` - The remote history client

pub mod calculator;
pub mod config;
pub mod error;
pub mod history;
mod mirror;
pub mod notice;

pub use tally_core as core;
pub use tally_store as store;
pub use tally_sync as sync;

pub use calculator::{Calculator, RenderModel};
pub use config::CalculatorConfig;
pub use error::{Result, TallyError};
pub use history::{HistoryCache, MirrorStatus};
pub use notice::{Notice, SyncOperation};

pub use tally_core::{HistoryEntry, Key, Operator, Session};
