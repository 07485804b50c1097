//! The entry buffer: the operand currently being typed.
//!
//! The buffer holds text rather than a number so that intermediate forms
//! like `0.` or `-0` survive until the next keystroke. Invariants:
//!
//! - never empty (the cleared buffer is `"0"`)
//! - at most one decimal point
//! - no redundant leading zero (`"05"` never occurs)
//! - an optional leading `-`

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::key::Digit;

const ZERO: &str = "0";
const NEGATIVE_ZERO: &str = "-0";
const MINUS: char = '-';
const DECIMAL_POINT: char = '.';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryBuffer {
    text: String,
}

impl EntryBuffer {
    /// Create a cleared buffer.
    pub fn new() -> Self {
        Self { text: ZERO.into() }
    }

    /// Restore a buffer from text, rejecting anything the buffer could not
    /// have produced itself.
    pub fn from_text(text: &str) -> Option<Self> {
        is_well_formed(text).then(|| Self { text: text.into() })
    }

    /// A buffer showing `value`, or a cleared buffer if it is not finite.
    pub fn from_value(value: f64) -> Self {
        if !value.is_finite() || value == 0.0 {
            return Self::new();
        }
        Self::from_text(&value.to_string()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_cleared(&self) -> bool {
        self.text == ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.text.starts_with(MINUS)
    }

    pub fn has_decimal_point(&self) -> bool {
        self.text.contains(DECIMAL_POINT)
    }

    /// Append a digit. Returns whether the text changed.
    ///
    /// A zero on a bare zero is dropped; any other digit replaces the bare
    /// zero, keeping a sign toggled onto it (`-0` then `5` gives `-5`).
    pub fn push_digit(&mut self, digit: Digit) -> bool {
        if self.is_bare_zero() {
            if digit == Digit::ZERO {
                return false;
            }
            self.text.pop();
        }
        self.text.push(digit.as_char());
        true
    }

    /// Append `00`. Dropped on a bare zero.
    pub fn push_double_zero(&mut self) -> bool {
        if self.is_bare_zero() {
            return false;
        }
        self.text.push_str("00");
        true
    }

    /// Append a decimal point. Dropped if one is already present.
    pub fn push_decimal_point(&mut self) -> bool {
        if self.has_decimal_point() {
            return false;
        }
        self.text.push(DECIMAL_POINT);
        true
    }

    pub fn toggle_sign(&mut self) {
        if self.is_negative() {
            self.text.remove(0);
        } else {
            self.text.insert(0, MINUS);
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.text.push_str(ZERO);
    }

    /// The numeric value, or `None` if the text is not a finite decimal.
    pub fn as_number(&self) -> Option<f64> {
        self.text.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// `0` or `-0`: nothing typed yet apart from a sign.
    pub fn is_bare_zero(&self) -> bool {
        self.text == ZERO || self.text == NEGATIVE_ZERO
    }
}

impl Default for EntryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn is_well_formed(text: &str) -> bool {
    let unsigned = text.strip_prefix(MINUS).unwrap_or(text);
    let (integral, fraction) = match unsigned.split_once(DECIMAL_POINT) {
        Some((integral, fraction)) => (integral, Some(fraction)),
        None => (unsigned, None),
    };

    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if integral.is_empty() || !digits(integral) {
        return false;
    }
    if integral.len() > 1 && integral.starts_with('0') {
        return false;
    }
    fraction.map_or(true, digits)
}
