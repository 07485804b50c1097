//! Calculator configuration.

use tally_core::EngineOptions;

/// Configuration for a [`Calculator`](crate::Calculator).
#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    /// Key under which the session record is stored.
    pub session_id: String,
    /// Record percent completions in history like `=` completions.
    pub record_percent_in_history: bool,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            session_id: "calculator".into(),
            record_percent_in_history: false,
        }
    }
}

impl CalculatorConfig {
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn with_percent_recording(mut self, record: bool) -> Self {
        self.record_percent_in_history = record;
        self
    }

    pub(crate) fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            record_percent: self.record_percent_in_history,
        }
    }
}
