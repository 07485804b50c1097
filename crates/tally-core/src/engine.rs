//! The evaluation state machine.
//!
//! A [`Session`] is an owned value: [`step`] consumes it together with one
//! [`Key`] and returns the next session plus at most one [`Effect`] for the
//! caller to carry out (recording history, clearing history). Nothing here
//! touches storage or the network.
//!
//! ```text
//!                 digit                        digit
//!              ┌────────┐                   ┌────────┐
//!              ▼        │     operator      ▼        │
//!       Operand1Entry ──┴──────────────▶ Operand2Entry ─┘
//!              ▲                          │   ▲     │
//!        digit │                 = / %    │   │     │ operator (chain)
//!              │                          ▼   │     │
//!              └──────────────────────  ResultHeld ◀┘ records history
//!                                        operator
//! ```

use serde::{Deserialize, Serialize};

use crate::entry::EntryBuffer;
use crate::format::format_value;
use crate::history::HistoryEntry;
use crate::key::{Key, Operator};

/// Where the calculation stands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EvalState {
    /// Typing the first operand (or sitting on the seed from a previous result).
    Operand1Entry { operand1: f64 },

    /// An operator is chosen; the second operand is absent until a digit is typed.
    Operand2Entry {
        operand1: f64,
        operator: Operator,
        operand2: Option<f64>,
    },

    /// A calculation just completed. The result seeds whatever comes next.
    ResultHeld(Completed),
}

impl Default for EvalState {
    fn default() -> Self {
        EvalState::Operand1Entry { operand1: 0.0 }
    }
}

/// A completed binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Completed {
    pub operand1: f64,
    pub operator: Operator,
    pub operand2: f64,
    pub result: f64,
    /// The second operand was applied as a percentage.
    pub percent: bool,
}

impl Completed {
    fn evaluate(operand1: f64, operator: Operator, operand2: f64) -> Self {
        Self {
            operand1,
            operator,
            operand2,
            result: operator.apply(operand1, operand2),
            percent: false,
        }
    }

    fn evaluate_percent(operand1: f64, operator: Operator, operand2: f64) -> Self {
        Self {
            operand1,
            operator,
            operand2,
            result: operator.apply_percent(operand1, operand2),
            percent: true,
        }
    }

    /// The expression text, e.g. `3 + 4` or `200 + 10%`.
    pub fn expression(&self) -> String {
        let marker = if self.percent { "%" } else { "" };
        format!(
            "{} {} {}{}",
            format_value(self.operand1),
            self.operator.symbol(),
            format_value(self.operand2),
            marker
        )
    }

    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry::new(self.expression(), format_value(self.result))
    }
}

/// The calculation state together with the text being typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub state: EvalState,
    pub buffer: EntryBuffer,
}

impl Session {
    pub fn new(state: EvalState, buffer: EntryBuffer) -> Self {
        Self { state, buffer }
    }

    /// The value the next operation builds on.
    pub fn operand1(&self) -> f64 {
        match self.state {
            EvalState::Operand1Entry { operand1 } | EvalState::Operand2Entry { operand1, .. } => {
                operand1
            }
            EvalState::ResultHeld(done) => done.result,
        }
    }

    /// The pending operator, if one is chosen and not yet applied.
    pub fn operator(&self) -> Option<Operator> {
        match self.state {
            EvalState::Operand2Entry { operator, .. } => Some(operator),
            _ => None,
        }
    }

    pub fn operand2(&self) -> Option<f64> {
        match self.state {
            EvalState::Operand2Entry { operand2, .. } => operand2,
            _ => None,
        }
    }

    pub fn result(&self) -> Option<f64> {
        match self.state {
            EvalState::ResultHeld(done) => Some(done.result),
            _ => None,
        }
    }

    /// The main display line.
    ///
    /// While an operand is being typed this is the buffer text itself, so
    /// forms like `0.` show as typed.
    pub fn input_text(&self) -> String {
        match self.state {
            EvalState::Operand1Entry { operand1 } if self.buffer.as_number() == Some(operand1) => {
                self.buffer.to_string()
            }
            EvalState::Operand1Entry { operand1 } => format_value(operand1),
            EvalState::Operand2Entry { operand2: Some(_), .. } => self.buffer.to_string(),
            EvalState::Operand2Entry { operand1, .. } => format_value(operand1),
            EvalState::ResultHeld(done) => format_value(done.result),
        }
    }

    /// The equation preview line, e.g. `3 + 4` while typing or after `=`.
    pub fn equation_text(&self) -> String {
        match self.state {
            EvalState::Operand1Entry { .. } => String::new(),
            EvalState::Operand2Entry {
                operand1,
                operator,
                operand2,
            } => match operand2 {
                Some(operand2) => format!(
                    "{} {} {}",
                    format_value(operand1),
                    operator.symbol(),
                    format_value(operand2)
                ),
                None => format!("{} {}", format_value(operand1), operator.symbol()),
            },
            EvalState::ResultHeld(done) => done.expression(),
        }
    }
}

/// A side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append this entry to history.
    Record(HistoryEntry),
    /// Clear all history, locally and remotely.
    ClearHistory,
}

/// The outcome of one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub session: Session,
    pub effect: Option<Effect>,
}

impl Step {
    fn quiet(session: Session) -> Self {
        Self {
            session,
            effect: None,
        }
    }

    fn with(session: Session, effect: Effect) -> Self {
        Self {
            session,
            effect: Some(effect),
        }
    }
}

/// Policies the surrounding application may choose.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Record percent completions in history like `=` completions.
    pub record_percent: bool,
}

/// Apply one key to a session.
///
/// Never fails: a key that does not apply in the current state leaves the
/// calculation unchanged.
pub fn step(session: Session, key: Key, options: &EngineOptions) -> Step {
    match key {
        Key::Digit(digit) => edit(session, |buffer| {
            buffer.push_digit(digit);
        }),
        Key::DoubleZero => edit(session, |buffer| {
            buffer.push_double_zero();
        }),
        Key::Decimal => edit(session, |buffer| {
            buffer.push_decimal_point();
        }),
        Key::ToggleSign => toggle_sign(session),
        Key::Operator(op) => choose_operator(session, op),
        Key::Equals => equals(session),
        Key::Percent => percent(session, options),
        Key::AllClear => Step::with(Session::default(), Effect::ClearHistory),
        Key::ClearHistory => Step::with(session, Effect::ClearHistory),
    }
}

/// Edit the buffer, then commit its value to the operand being typed.
///
/// A zero typed onto a cleared buffer leaves the text alone but still
/// commits, so `5 ÷ 0` sets the second operand.
fn edit(mut session: Session, f: impl FnOnce(&mut EntryBuffer)) -> Step {
    f(&mut session.buffer);
    commit(session)
}

/// Flip the sign of the buffer.
///
/// A sign on a bare zero is only a prefix for the digits to come; nothing is
/// committed until one is typed.
fn toggle_sign(mut session: Session) -> Step {
    session.buffer.toggle_sign();
    if session.buffer.is_bare_zero() {
        return Step::quiet(session);
    }
    commit(session)
}

fn commit(mut session: Session) -> Step {
    let Some(value) = session.buffer.as_number() else {
        return Step::quiet(session);
    };

    session.state = match session.state {
        EvalState::Operand2Entry {
            operand1, operator, ..
        } => EvalState::Operand2Entry {
            operand1,
            operator,
            operand2: Some(value),
        },
        EvalState::Operand1Entry { .. } | EvalState::ResultHeld(_) => {
            EvalState::Operand1Entry { operand1: value }
        }
    };
    Step::quiet(session)
}

fn choose_operator(mut session: Session, op: Operator) -> Step {
    session.buffer.clear();

    let (operand1, effect) = match session.state {
        EvalState::Operand2Entry {
            operand1,
            operator,
            operand2: Some(operand2),
        } => {
            // Chaining: finish the pending calculation first.
            let done = Completed::evaluate(operand1, operator, operand2);
            (done.result, Some(Effect::Record(done.history_entry())))
        }
        EvalState::Operand2Entry { operand1, .. } | EvalState::Operand1Entry { operand1 } => {
            (operand1, None)
        }
        EvalState::ResultHeld(done) => (done.result, None),
    };

    session.state = EvalState::Operand2Entry {
        operand1,
        operator: op,
        operand2: None,
    };
    Step { session, effect }
}

fn equals(mut session: Session) -> Step {
    session.buffer.clear();

    match session.state {
        EvalState::Operand2Entry {
            operand1,
            operator,
            operand2: Some(operand2),
        } => {
            let done = Completed::evaluate(operand1, operator, operand2);
            session.state = EvalState::ResultHeld(done);
            Step::with(session, Effect::Record(done.history_entry()))
        }
        _ => Step::quiet(session),
    }
}

fn percent(mut session: Session, options: &EngineOptions) -> Step {
    match session.state {
        EvalState::Operand2Entry {
            operand1,
            operator,
            operand2: Some(operand2),
        } => {
            let done = Completed::evaluate_percent(operand1, operator, operand2);
            session.state = EvalState::ResultHeld(done);
            session.buffer.clear();
            if options.record_percent {
                Step::with(session, Effect::Record(done.history_entry()))
            } else {
                Step::quiet(session)
            }
        }
        EvalState::Operand2Entry {
            operand1, operator, ..
        } => {
            session.state = EvalState::Operand2Entry {
                operand1: operand1 / 100.0,
                operator,
                operand2: None,
            };
            session.buffer.clear();
            Step::quiet(session)
        }
        EvalState::Operand1Entry { .. } | EvalState::ResultHeld(_) => {
            let value = session.operand1() / 100.0;
            session.state = EvalState::Operand1Entry { operand1: value };
            session.buffer = EntryBuffer::from_value(value);
            Step::quiet(session)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::UNDEFINED;
    use proptest::prelude::*;

    fn run(keys: &str) -> (Session, Vec<HistoryEntry>) {
        run_with(keys, &EngineOptions::default())
    }

    fn run_with(keys: &str, options: &EngineOptions) -> (Session, Vec<HistoryEntry>) {
        let mut session = Session::default();
        let mut history = Vec::new();
        for token in keys.split_whitespace() {
            let key: Key = token.parse().unwrap();
            let step = step(session, key, options);
            session = step.session;
            match step.effect {
                Some(Effect::Record(entry)) => history.push(entry),
                Some(Effect::ClearHistory) => history.clear(),
                None => {}
            }
        }
        (session, history)
    }

    #[test]
    fn test_digits_commit_to_operand1() {
        let (session, history) = run("1 2 . 5");
        assert_eq!(session.state, EvalState::Operand1Entry { operand1: 12.5 });
        assert_eq!(session.input_text(), "12.5");
        assert!(history.is_empty());
    }

    #[test]
    fn test_simple_addition() {
        let (session, history) = run("3 + 4 =");
        assert_eq!(session.result(), Some(7.0));
        assert_eq!(session.input_text(), "7");
        assert_eq!(session.equation_text(), "3 + 4");
        assert_eq!(session.buffer.as_str(), "0");
        assert_eq!(history, vec![HistoryEntry::new("3 + 4", "7")]);
    }

    #[test]
    fn test_operator_chaining() {
        let (session, history) = run("3 + 4 +");
        assert_eq!(session.operand1(), 7.0);
        assert_eq!(session.operator(), Some(Operator::Add));
        assert_eq!(session.equation_text(), "7 +");
        assert_eq!(history.len(), 1);

        let (session, history) = run("3 + 4 + 2 =");
        assert_eq!(session.result(), Some(9.0));
        assert_eq!(
            history,
            vec![
                HistoryEntry::new("3 + 4", "7"),
                HistoryEntry::new("7 + 2", "9"),
            ]
        );
    }

    #[test]
    fn test_operator_replaced_without_operand2() {
        let (session, history) = run("8 + \u{00d7} 2 =");
        assert_eq!(session.result(), Some(16.0));
        assert_eq!(history, vec![HistoryEntry::new("8 \u{00d7} 2", "16")]);
    }

    #[test]
    fn test_equals_twice_records_once() {
        let (first, history) = run("6 \u{00d7} 7 =");
        let (second, history_after) = run("6 \u{00d7} 7 = =");
        assert_eq!(first, second);
        assert_eq!(history, history_after);
        assert_eq!(history_after.len(), 1);
    }

    #[test]
    fn test_equals_without_operand2_is_noop() {
        let (session, history) = run("5 =");
        assert_eq!(session.state, EvalState::Operand1Entry { operand1: 5.0 });
        assert_eq!(session.buffer.as_str(), "0");
        assert!(history.is_empty());

        let (session, history) = run("5 + =");
        assert_eq!(session.operator(), Some(Operator::Add));
        assert!(history.is_empty());
    }

    #[test]
    fn test_division_by_zero() {
        let (session, history) = run("5 \u{00f7} 0 =");
        assert!(session.result().unwrap().is_nan());
        assert_eq!(session.input_text(), UNDEFINED);
        assert_eq!(history, vec![HistoryEntry::new("5 \u{00f7} 0", UNDEFINED)]);
    }

    #[test]
    fn test_result_seeds_next_chain() {
        let (session, history) = run("2 + 3 = \u{00d7} 4 =");
        assert_eq!(session.result(), Some(20.0));
        assert_eq!(history[1], HistoryEntry::new("5 \u{00d7} 4", "20"));
    }

    #[test]
    fn test_digit_after_result_starts_fresh() {
        let (session, _) = run("2 + 3 = 9");
        assert_eq!(session.state, EvalState::Operand1Entry { operand1: 9.0 });
        assert_eq!(session.input_text(), "9");
        assert_eq!(session.equation_text(), "");
    }

    #[test]
    fn test_percent_without_operator() {
        let (session, history) = run("5 0 %");
        assert_eq!(session.state, EvalState::Operand1Entry { operand1: 0.5 });
        assert_eq!(session.buffer.as_str(), "0.5");
        assert!(history.is_empty());
    }

    #[test]
    fn test_percent_with_operator() {
        let (session, history) = run("2 0 0 + 1 0 %");
        assert_eq!(session.result(), Some(220.0));
        assert_eq!(session.equation_text(), "200 + 10%");
        assert!(history.is_empty());

        let (session, _) = run("2 0 0 \u{00d7} 1 0 %");
        assert_eq!(session.result(), Some(20.0));
    }

    #[test]
    fn test_percent_recorded_when_enabled() {
        let options = EngineOptions {
            record_percent: true,
        };
        let (_, history) = run_with("2 0 0 - 1 0 %", &options);
        assert_eq!(history, vec![HistoryEntry::new("200 \u{2212} 10%", "180")]);
    }

    #[test]
    fn test_percent_on_pending_operator_scales_operand1() {
        let (session, _) = run("5 0 + %");
        assert_eq!(session.operand1(), 0.5);
        assert_eq!(session.operator(), Some(Operator::Add));
    }

    #[test]
    fn test_all_clear() {
        let step = step(run("3 + 4").0, Key::AllClear, &EngineOptions::default());
        assert_eq!(step.session, Session::default());
        assert_eq!(step.effect, Some(Effect::ClearHistory));
    }

    #[test]
    fn test_clear_history_keeps_calculation() {
        let before = run("3 + 4").0;
        let step = step(before.clone(), Key::ClearHistory, &EngineOptions::default());
        assert_eq!(step.session, before);
        assert_eq!(step.effect, Some(Effect::ClearHistory));
    }

    #[test]
    fn test_sign_toggle_commits() {
        let (session, _) = run("+/- 5");
        assert_eq!(session.operand1(), -5.0);
        assert_eq!(session.input_text(), "-5");

        let (session, _) = run("9 - 4 +/- =");
        assert_eq!(session.result(), Some(13.0));
    }

    #[test]
    fn test_sign_toggle_on_fresh_operand2_commits_nothing() {
        let (session, history) = run("5 \u{00f7} +/- =");
        assert!(history.is_empty());
        assert_eq!(session.operand2(), None);
        assert_eq!(session.operator(), Some(Operator::Divide));
        assert_eq!(session.equation_text(), "5 \u{00f7}");

        let (session, history) = run("5 \u{00f7} +/-");
        assert_eq!(session.operand2(), None);
        assert!(history.is_empty());

        let (_, history) = run("6 \u{00f7} +/- 3 =");
        assert_eq!(history, vec![HistoryEntry::new("6 \u{00f7} -3", "-2")]);
    }

    #[test]
    fn test_sign_toggle_after_result_keeps_result() {
        let (session, _) = run("2 + 3 = +/-");
        assert_eq!(session.result(), Some(5.0));

        let (session, _) = run("2 + 3 = +/- 4");
        assert_eq!(session.operand1(), -4.0);
    }

    #[test]
    fn test_input_text_shows_buffer_while_typing() {
        let (session, _) = run("3 .");
        assert_eq!(session.input_text(), "3.");
        let (session, _) = run("3 + 0 .");
        assert_eq!(session.input_text(), "0.");
        assert_eq!(session.equation_text(), "3 + 0");
    }

    fn key() -> impl Strategy<Value = Key> {
        prop_oneof![
            (0u8..=9).prop_map(|d| Key::Digit(crate::key::Digit::new(d).unwrap())),
            Just(Key::Decimal),
            Just(Key::DoubleZero),
            Just(Key::ToggleSign),
            prop::sample::select(Operator::ALL.to_vec()).prop_map(Key::Operator),
            Just(Key::Equals),
            Just(Key::Percent),
        ]
    }

    proptest! {
        #[test]
        fn prop_second_equals_is_noop(keys in prop::collection::vec(key(), 0..30)) {
            let options = EngineOptions::default();
            let mut session = Session::default();
            for key in keys {
                session = step(session, key, &options).session;
            }
            let once = step(session, Key::Equals, &options).session;
            let twice = step(once.clone(), Key::Equals, &options);
            prop_assert!(twice.effect.is_none());
            prop_assert_eq!(format!("{:?}", twice.session), format!("{:?}", once));
        }

        #[test]
        fn prop_buffer_never_reaches_state_malformed(keys in prop::collection::vec(key(), 0..30)) {
            let options = EngineOptions::default();
            let mut session = Session::default();
            for key in keys {
                session = step(session, key, &options).session;
                prop_assert!(EntryBuffer::from_text(session.buffer.as_str()).is_some());
            }
        }
    }
}
