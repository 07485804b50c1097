//! Remote client configuration.

use std::time::Duration;

/// Configuration for the HTTP remote.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the history service; `history` is resolved against it.
    pub base_url: String,
    /// Timeout for a whole request, connect through body.
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/".into(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl SyncConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
