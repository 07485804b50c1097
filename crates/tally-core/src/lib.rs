//! # Tally Core
//!
//! Pure primitives for Tally: the entry buffer, the evaluation state machine,
//! history entries and the persisted session mapping.
//!
//! This crate contains no I/O, no storage, no networking. Every operation
//! takes a value and returns the updated value.
//!
//! ## Key Types
//!
//! - [`EntryBuffer`] - The operand currently being typed, as text
//! - [`EvalState`] - The calculation state machine
//! - [`Session`] - An `EvalState` together with its `EntryBuffer`
//! - [`Key`] - A discrete user action fed into [`step`]
//! - [`HistoryEntry`] - One completed calculation
//! - [`SessionBlob`] - The flat key/value form of a `Session` used for persistence
//!
//! ## Evaluation
//!
//! The evaluator is calculator-style: strictly left to right, two operands at
//! a time. Choosing a second operator while a calculation is complete chains
//! it, finalizing the first calculation.
//!
//! ```rust
//! use tally_core::{step, EngineOptions, Key, Session};
//!
//! let options = EngineOptions::default();
//! let mut session = Session::default();
//! for key in ["3", "+", "4", "+", "2", "="] {
//!     let key: Key = key.parse().unwrap();
//!     session = step(session, key, &options).session;
//! }
//! assert_eq!(session.input_text(), "9");
//! ```

pub mod engine;
pub mod entry;
pub mod error;
pub mod format;
pub mod history;
pub mod key;
pub mod session;

pub use engine::{step, Completed, Effect, EngineOptions, EvalState, Session, Step};
pub use entry::EntryBuffer;
pub use error::CoreError;
pub use format::{format_value, UNDEFINED};
pub use history::HistoryEntry;
pub use key::{Digit, Key, Operator};
pub use session::SessionBlob;
