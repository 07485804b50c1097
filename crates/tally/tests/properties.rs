//! Property tests over arbitrary keystroke sequences.

use proptest::prelude::*;

use tally::core::{step, EngineOptions, Key, Session};
use tally::{Calculator, CalculatorConfig};
use tally_testkit::generators::{calculation, entry_keys, integer_keys, keystrokes};
use tally_testkit::TestFixture;

proptest! {
    #[test]
    fn buffer_stays_well_formed(keys in entry_keys(40)) {
        let mut session = Session::default();
        let options = EngineOptions::default();
        for key in keys {
            session = step(session, key, &options).session;

            let text = session.buffer.as_str();
            let digits = text.trim_start_matches('-');
            prop_assert!(text.matches('.').count() <= 1, "{:?}", text);
            prop_assert!(!digits.is_empty());
            prop_assert!(
                digits == "0" || !digits.starts_with('0') || digits.starts_with("0."),
                "redundant leading zero in {:?}",
                text
            );
        }
    }

    #[test]
    fn repeated_equals_never_records_twice(keys in keystrokes(40)) {
        let mut calc = TestFixture::new().offline_calculator();
        calc.press_all(keys);
        calc.press(Key::Equals);
        let before = calc.render();

        calc.press(Key::Equals);
        let after = calc.render();
        prop_assert_eq!(after.history, before.history);
        prop_assert_eq!(after.input, before.input);
    }

    #[test]
    fn chaining_equals_stepwise((a, op1, b) in calculation(), (_, op2, c) in calculation()) {
        let mut chained = TestFixture::new().offline_calculator();
        chained.press_all(integer_keys(a));
        chained.press(Key::Operator(op1));
        chained.press_all(integer_keys(b));
        chained.press(Key::Operator(op2));
        chained.press_all(integer_keys(c));
        chained.press(Key::Equals);

        let mut stepwise = TestFixture::new().offline_calculator();
        stepwise.press_all(integer_keys(a));
        stepwise.press(Key::Operator(op1));
        stepwise.press_all(integer_keys(b));
        stepwise.press(Key::Equals);
        stepwise.press(Key::Operator(op2));
        stepwise.press_all(integer_keys(c));
        stepwise.press(Key::Equals);

        let chained = chained.render();
        let stepwise = stepwise.render();
        prop_assert_eq!(chained.history.len(), 2);
        prop_assert_eq!(chained.history, stepwise.history);
        prop_assert_eq!(chained.input, stepwise.input);
    }

    #[test]
    fn all_clear_resets_everything(keys in keystrokes(40)) {
        let mut calc = TestFixture::new().offline_calculator();
        calc.press_all(keys);
        calc.press(Key::AllClear);

        prop_assert_eq!(calc.session(), &Session::default());
        prop_assert!(calc.render().history.is_empty());
    }

    #[test]
    fn reopen_restores_the_display(keys in keystrokes(40)) {
        let fixture = TestFixture::new();
        let before = {
            let mut calc = fixture.offline_calculator();
            calc.press_all(keys);
            calc.render()
        };

        let after = Calculator::open(fixture.store.clone(), None, CalculatorConfig::default()).render();
        prop_assert_eq!(after.input, before.input);
        prop_assert_eq!(after.history, before.history);
    }
}
