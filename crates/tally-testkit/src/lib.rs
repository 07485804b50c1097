//! # Tally Testkit
//!
//! Testing utilities for Tally.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden scenarios**: Keystroke sequences with the exact render output they must produce
//! - **Generators**: Proptest strategies for keys and keystroke sequences
//! - **Fixtures**: A memory store and a scriptable memory remote wired to a calculator
//!
//! ## Golden Scenarios
//!
//! ```rust
//! use tally_testkit::scenarios::{all_scenarios, run_offline};
//!
//! for scenario in all_scenarios() {
//!     let view = run_offline(&scenario);
//!     assert_eq!(view.input, scenario.input, "{}", scenario.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use tally_testkit::generators::keystrokes;
//!
//! proptest! {
//!     #[test]
//!     fn never_panics(keys in keystrokes(64)) {
//!         let mut calc = tally_testkit::TestFixture::new().offline_calculator();
//!         calc.press_all(keys);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use tally_testkit::fixtures::{keys, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let mut calc = fixture.offline_calculator();
//! calc.press_all(keys("3 + 4 ="));
//! assert_eq!(calc.render().history, vec!["3 + 4 = 7"]);
//! ```

pub mod fixtures;
pub mod generators;
pub mod scenarios;

pub use fixtures::{keys, TestFixture};
pub use generators::{entry_keys, key, keystrokes, operator};
pub use scenarios::{all_scenarios, run_offline, verify_all_scenarios, Scenario};
