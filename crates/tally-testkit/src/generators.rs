//! Proptest generators for property-based testing.

use proptest::prelude::*;

use tally_core::{Digit, Key, Operator};

/// Generate a digit key, 0-9.
pub fn digit() -> impl Strategy<Value = Key> {
    (0u8..=9).prop_filter_map("digit", |d| Digit::new(d).map(Key::Digit))
}

/// Generate an operator.
pub fn operator() -> impl Strategy<Value = Operator> {
    prop::sample::select(Operator::ALL.to_vec())
}

/// Generate a key that edits the entry buffer: digits, `00`, `.` and `±`.
pub fn entry_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        6 => digit(),
        1 => Just(Key::DoubleZero),
        2 => Just(Key::Decimal),
        1 => Just(Key::ToggleSign),
    ]
}

/// Generate a sequence of buffer-editing keys.
pub fn entry_keys(max_len: usize) -> impl Strategy<Value = Vec<Key>> {
    prop::collection::vec(entry_key(), 0..=max_len)
}

/// Generate any key, weighted towards the ones typed most.
pub fn key() -> impl Strategy<Value = Key> {
    prop_oneof![
        10 => entry_key(),
        4 => operator().prop_map(Key::Operator),
        2 => Just(Key::Equals),
        1 => Just(Key::Percent),
        1 => Just(Key::AllClear),
        1 => Just(Key::ClearHistory),
    ]
}

/// Generate a keystroke sequence.
pub fn keystrokes(max_len: usize) -> impl Strategy<Value = Vec<Key>> {
    prop::collection::vec(key(), 0..=max_len)
}

/// Generate a complete `a op b =` calculation over small integers.
pub fn calculation() -> impl Strategy<Value = (u32, Operator, u32)> {
    (0u32..1000, operator(), 0u32..1000)
}

/// The keys that type `value` as a non-negative integer.
pub fn integer_keys(value: u32) -> Vec<Key> {
    value
        .to_string()
        .bytes()
        .filter_map(|b| Digit::new(b - b'0').map(Key::Digit))
        .collect()
}
