//! Operators, digits and keys: the vocabulary of user actions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// All operators, in keypad order.
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// The symbol shown in equations and history lines.
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "\u{2212}",
            Operator::Multiply => "\u{00d7}",
            Operator::Divide => "\u{00f7}",
        }
    }

    /// The stable name used in persisted sessions.
    pub const fn name(self) -> &'static str {
        match self {
            Operator::Add => "ADDITION",
            Operator::Subtract => "SUBTRACTION",
            Operator::Multiply => "MULTIPLICATION",
            Operator::Divide => "DIVISION",
        }
    }

    /// Look up an operator by its persisted name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Apply the operator to two operands.
    ///
    /// Division by zero yields NaN, which renders as "undefined". It is a
    /// value, not an error.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide if rhs == 0.0 => f64::NAN,
            Operator::Divide => lhs / rhs,
        }
    }

    /// Apply the operator with `rhs` read as a percentage.
    ///
    /// Addition and subtraction adjust `lhs` by `rhs` percent of itself;
    /// multiplication and division use `rhs / 100` as the second operand.
    pub fn apply_percent(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add | Operator::Subtract => self.apply(lhs, lhs * rhs / 100.0),
            Operator::Multiply | Operator::Divide => self.apply(lhs, rhs / 100.0),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CoreError;

    /// Accepts keypad symbols, ASCII stand-ins, or persisted names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Operator::Add),
            "-" | "\u{2212}" => Ok(Operator::Subtract),
            "*" | "x" | "\u{00d7}" => Ok(Operator::Multiply),
            "/" | "\u{00f7}" => Ok(Operator::Divide),
            other => Self::from_name(other).ok_or_else(|| CoreError::UnknownOperator(other.into())),
        }
    }
}

/// A single decimal digit, 0 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digit(u8);

impl Digit {
    pub const ZERO: Self = Self(0);

    /// Create a digit, rejecting values above 9.
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 9 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<u8> for Digit {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(CoreError::InvalidDigit(value))
    }
}

/// A discrete user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Digit(Digit),
    DoubleZero,
    Decimal,
    Operator(Operator),
    Equals,
    Percent,
    ToggleSign,
    /// Reset the calculation and clear history.
    AllClear,
    /// Clear history only.
    ClearHistory,
}

impl From<Digit> for Key {
    fn from(digit: Digit) -> Self {
        Key::Digit(digit)
    }
}

impl From<Operator> for Key {
    fn from(op: Operator) -> Self {
        Key::Operator(op)
    }
}

impl FromStr for Key {
    type Err = CoreError;

    /// Parse a keypad token such as `7`, `00`, `.`, `+`, `=`, `%`, `+/-`, `AC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "00" => Ok(Key::DoubleZero),
            "." => Ok(Key::Decimal),
            "=" => Ok(Key::Equals),
            "%" => Ok(Key::Percent),
            "+/-" | "\u{00b1}" => Ok(Key::ToggleSign),
            "AC" => Ok(Key::AllClear),
            "CH" => Ok(Key::ClearHistory),
            _ => {
                let mut chars = s.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    if let Some(value) = c.to_digit(10) {
                        return Ok(Key::Digit(Digit(value as u8)));
                    }
                }
                s.parse::<Operator>()
                    .map(Key::Operator)
                    .map_err(|_| CoreError::UnknownKey(s.into()))
            }
        }
    }
}
