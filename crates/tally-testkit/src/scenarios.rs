//! Golden keystroke scenarios.
//!
//! Each scenario is a keypad script and the exact render output it must
//! produce on a fresh offline calculator.

use tally::RenderModel;

use crate::fixtures::{keys, TestFixture};

/// A golden scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Human-readable name.
    pub name: &'static str,
    /// Whitespace-separated keypad tokens.
    pub keys: &'static str,
    /// Expected main display line.
    pub input: &'static str,
    /// Expected equation preview.
    pub equation: &'static str,
    /// Expected history lines, oldest first.
    pub history: &'static [&'static str],
}

/// Get all golden scenarios.
pub fn all_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "chained addition",
            keys: "3 + 4 + 2 =",
            input: "9",
            equation: "7 + 2",
            history: &["3 + 4 = 7", "7 + 2 = 9"],
        },
        Scenario {
            name: "repeated equals",
            keys: "3 + 4 = =",
            input: "7",
            equation: "3 + 4",
            history: &["3 + 4 = 7"],
        },
        Scenario {
            name: "division by zero",
            keys: "5 \u{00f7} 0 =",
            input: "undefined",
            equation: "5 \u{00f7} 0",
            history: &["5 \u{00f7} 0 = undefined"],
        },
        Scenario {
            name: "leading zeros collapse",
            keys: "0 0 5",
            input: "5",
            equation: "",
            history: &[],
        },
        Scenario {
            name: "double zero",
            keys: "1 00 . 5",
            input: "100.5",
            equation: "",
            history: &[],
        },
        Scenario {
            name: "second decimal point ignored",
            keys: "1 . 2 . 3",
            input: "1.23",
            equation: "",
            history: &[],
        },
        Scenario {
            name: "sign toggle on zero",
            keys: "+/- 5",
            input: "-5",
            equation: "",
            history: &[],
        },
        Scenario {
            name: "negative second operand",
            keys: "6 \u{00f7} +/- 3 =",
            input: "-2",
            equation: "6 \u{00f7} -3",
            history: &["6 \u{00f7} -3 = -2"],
        },
        Scenario {
            name: "decimal operands",
            keys: "1 . 5 \u{00d7} 4 =",
            input: "6",
            equation: "1.5 \u{00d7} 4",
            history: &["1.5 \u{00d7} 4 = 6"],
        },
        Scenario {
            name: "negative result",
            keys: "3 \u{2212} 8 =",
            input: "-5",
            equation: "3 \u{2212} 8",
            history: &["3 \u{2212} 8 = -5"],
        },
        Scenario {
            name: "operator replaced before second operand",
            keys: "6 + \u{00d7} 7 =",
            input: "42",
            equation: "6 \u{00d7} 7",
            history: &["6 \u{00d7} 7 = 42"],
        },
        Scenario {
            name: "result seeds the next calculation",
            keys: "2 + 3 = \u{00d7} 4 =",
            input: "20",
            equation: "5 \u{00d7} 4",
            history: &["2 + 3 = 5", "5 \u{00d7} 4 = 20"],
        },
        Scenario {
            name: "digit after result starts over",
            keys: "2 + 3 = 7",
            input: "7",
            equation: "",
            history: &["2 + 3 = 5"],
        },
        Scenario {
            name: "percent of first operand",
            keys: "2 0 0 + 1 0 %",
            input: "220",
            equation: "200 + 10%",
            history: &[],
        },
        Scenario {
            name: "percent of multiplier",
            keys: "5 0 \u{00d7} 1 0 %",
            input: "5",
            equation: "50 \u{00d7} 10%",
            history: &[],
        },
        Scenario {
            name: "percent without operator",
            keys: "5 0 %",
            input: "0.5",
            equation: "",
            history: &[],
        },
        Scenario {
            name: "all clear",
            keys: "9 \u{00d7} 9 = AC",
            input: "0",
            equation: "",
            history: &[],
        },
        Scenario {
            name: "clear history keeps calculation",
            keys: "2 + 3 = CH",
            input: "5",
            equation: "2 + 3",
            history: &[],
        },
    ]
}

/// Run a scenario on a fresh offline calculator.
pub fn run_offline(scenario: &Scenario) -> RenderModel {
    let mut calc = TestFixture::new().offline_calculator();
    calc.press_all(keys(scenario.keys));
    calc.render()
}

/// Run every scenario and return the names of those whose output differs.
pub fn verify_all_scenarios() -> Vec<&'static str> {
    all_scenarios()
        .into_iter()
        .filter(|scenario| {
            let view = run_offline(scenario);
            view.input != scenario.input
                || view.equation != scenario.equation
                || view.history != scenario.history
        })
        .map(|scenario| scenario.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_scenarios_pass() {
        assert_eq!(verify_all_scenarios(), Vec::<&str>::new());
    }

    #[test]
    fn test_scenario_names_unique() {
        let scenarios = all_scenarios();
        let mut names: Vec<_> = scenarios.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), scenarios.len());
    }
}
