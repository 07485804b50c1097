//! Error types for Tally Core.

use thiserror::Error;

/// Errors raised when decoding core values from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("digit out of range: {0}")]
    InvalidDigit(u8),
}
