//! History entries: completed calculations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One completed calculation, e.g. `3 + 4 = 7`.
///
/// Immutable once created. Two entries with the same expression and result
/// text are the same entry for reconciliation purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryEntry {
    expression: String,
    result: String,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
        }
    }

    /// The left-hand side, e.g. `3 + 4`.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The result text, e.g. `7` or `undefined`.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// The rendered history line, `"{expression} = {result}"`.
    pub fn line(&self) -> String {
        self.to_string()
    }

    pub fn into_parts(self) -> (String, String) {
        (self.expression, self.result)
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.expression, self.result)
    }
}
