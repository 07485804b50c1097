//! The persisted form of a [`Session`].
//!
//! A session is stored as a flat record of optional text fields so that each
//! field can be decoded, and fail, independently. A field that does not
//! decode falls back to its own default; it never invalidates the rest.
//!
//! | Field      | Content                                  | Default   |
//! |------------|------------------------------------------|-----------|
//! | `operand1` | decimal text                             | `0`       |
//! | `operand2` | decimal text or absent                   | absent    |
//! | `result`   | decimal text or absent                   | absent    |
//! | `operator` | `ADDITION`, `SUBTRACTION`, ... or absent | absent    |
//! | `equation` | raw entry buffer text                    | `"0"`     |

use serde::{Deserialize, Serialize};

use crate::engine::{EvalState, Session};
use crate::entry::EntryBuffer;
use crate::key::Operator;

/// Field names of the persisted record.
pub mod fields {
    pub const OPERAND1: &str = "operand1";
    pub const OPERAND2: &str = "operand2";
    pub const RESULT: &str = "result";
    pub const OPERATOR: &str = "operator";
    pub const EQUATION: &str = "equation";

    pub const ALL: [&str; 5] = [OPERAND1, OPERAND2, RESULT, OPERATOR, EQUATION];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBlob {
    pub operand1: Option<String>,
    pub operand2: Option<String>,
    pub result: Option<String>,
    pub operator: Option<String>,
    pub equation: Option<String>,
}

impl SessionBlob {
    /// Capture a session for persistence.
    ///
    /// A held result is stored collapsed: it becomes `operand1` and the
    /// completed operands are dropped, since only the result seeds what
    /// comes next.
    pub fn capture(session: &Session) -> Self {
        let (operand1, operator, operand2) = match session.state {
            EvalState::Operand1Entry { operand1 } => (operand1, None, None),
            EvalState::Operand2Entry {
                operand1,
                operator,
                operand2,
            } => (operand1, Some(operator), operand2),
            EvalState::ResultHeld(done) => (done.result, None, None),
        };

        Self {
            operand1: Some(operand1.to_string()),
            operand2: operand2.map(|v| v.to_string()),
            result: None,
            operator: operator.map(|op| op.name().to_string()),
            equation: Some(session.buffer.to_string()),
        }
    }

    /// Rebuild a session, degrading each undecodable field to its default.
    pub fn restore(&self) -> Session {
        let operand1 = parse_number(self.operand1.as_deref()).unwrap_or(0.0);
        let operand2 = parse_number(self.operand2.as_deref());
        let result = parse_number(self.result.as_deref());
        let operator = self.operator.as_deref().and_then(Operator::from_name);
        let buffer = self
            .equation
            .as_deref()
            .and_then(EntryBuffer::from_text)
            .unwrap_or_default();

        let state = match (result, operator) {
            // A stored result is folded back into operand1.
            (Some(result), _) => EvalState::Operand1Entry { operand1: result },
            (None, Some(operator)) => EvalState::Operand2Entry {
                operand1,
                operator,
                operand2,
            },
            (None, None) => EvalState::Operand1Entry { operand1 },
        };

        Session::new(state, buffer)
    }

    /// The record as `(field, value)` pairs, in [`fields::ALL`] order.
    pub fn to_fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            (fields::OPERAND1, self.operand1.as_deref()),
            (fields::OPERAND2, self.operand2.as_deref()),
            (fields::RESULT, self.result.as_deref()),
            (fields::OPERATOR, self.operator.as_deref()),
            (fields::EQUATION, self.equation.as_deref()),
        ]
    }

    /// Build a record from `(field, value)` pairs. Unknown fields are ignored.
    pub fn from_fields<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<String>)>,
    {
        let mut blob = Self::default();
        for (field, value) in pairs {
            match field {
                fields::OPERAND1 => blob.operand1 = value,
                fields::OPERAND2 => blob.operand2 = value,
                fields::RESULT => blob.result = value,
                fields::OPERATOR => blob.operator = value,
                fields::EQUATION => blob.equation = value,
                _ => {}
            }
        }
        blob
    }
}

fn parse_number(text: Option<&str>) -> Option<f64> {
    text?.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{step, EngineOptions};
    use crate::key::Key;

    fn blob(fields: &[(&str, &str)]) -> SessionBlob {
        SessionBlob::from_fields(fields.iter().map(|(k, v)| (*k, Some(v.to_string()))))
    }

    #[test]
    fn test_roundtrip_pending_operator() {
        let session = Session::new(
            EvalState::Operand2Entry {
                operand1: 12.5,
                operator: Operator::Multiply,
                operand2: None,
            },
            EntryBuffer::new(),
        );
        let captured = SessionBlob::capture(&session);
        assert_eq!(captured.operator.as_deref(), Some("MULTIPLICATION"));
        assert_eq!(captured.operand2, None);
        assert_eq!(captured.result, None);
        assert_eq!(captured.restore(), session);
    }

    #[test]
    fn test_roundtrip_mid_entry() {
        let options = EngineOptions::default();
        let mut session = Session::default();
        for token in ["7", "-", "1", "."] {
            session = step(session, token.parse::<Key>().unwrap(), &options).session;
        }
        assert_eq!(SessionBlob::capture(&session).restore(), session);
    }

    #[test]
    fn test_result_held_is_stored_collapsed() {
        let options = EngineOptions::default();
        let mut session = Session::default();
        for token in ["3", "+", "4", "="] {
            session = step(session, token.parse::<Key>().unwrap(), &options).session;
        }
        let restored = SessionBlob::capture(&session).restore();
        assert_eq!(restored.state, EvalState::Operand1Entry { operand1: 7.0 });
        assert_eq!(restored.input_text(), "7");
    }

    #[test]
    fn test_undefined_result_survives() {
        let session = Session::new(
            EvalState::Operand1Entry { operand1: f64::NAN },
            EntryBuffer::new(),
        );
        let restored = SessionBlob::capture(&session).restore();
        assert!(restored.operand1().is_nan());
    }

    #[test]
    fn test_empty_blob_restores_default() {
        assert_eq!(SessionBlob::default().restore(), Session::default());
    }

    #[test]
    fn test_corrupt_operand2_degrades_to_absent() {
        let restored = blob(&[
            ("operand1", "4"),
            ("operand2", "four"),
            ("operator", "ADDITION"),
            ("equation", "0"),
        ])
        .restore();
        assert_eq!(
            restored.state,
            EvalState::Operand2Entry {
                operand1: 4.0,
                operator: Operator::Add,
                operand2: None,
            }
        );
    }

    #[test]
    fn test_corrupt_fields_degrade_independently() {
        let restored = blob(&[
            ("operand1", "12..5"),
            ("operator", "MODULO"),
            ("equation", "0x1f"),
        ])
        .restore();
        assert_eq!(restored, Session::default());
    }

    #[test]
    fn test_legacy_result_folds_into_operand1() {
        let restored = blob(&[
            ("operand1", "3.0"),
            ("operand2", "4.0"),
            ("result", "7.0"),
            ("operator", "ADDITION"),
        ])
        .restore();
        assert_eq!(restored.state, EvalState::Operand1Entry { operand1: 7.0 });
    }

    #[test]
    fn test_fields_roundtrip() {
        let original = blob(&[("operand1", "1"), ("equation", "1")]);
        let pairs = original
            .to_fields()
            .map(|(k, v)| (k, v.map(String::from)));
        assert_eq!(SessionBlob::from_fields(pairs), original);
    }
}
