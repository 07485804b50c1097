//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use tally::{Calculator, CalculatorConfig};
use tally_core::Key;
use tally_store::MemoryStore;
use tally_sync::{HistoryItem, HistoryRemote, MemoryRemote};

/// Parse a whitespace-separated keypad script such as `"3 + 4 ="`.
///
/// Panics on an unknown token.
pub fn keys(script: &str) -> Vec<Key> {
    script
        .split_whitespace()
        .map(|token| {
            token
                .parse()
                .unwrap_or_else(|e| panic!("bad key {:?} in script: {}", token, e))
        })
        .collect()
}

/// A memory store and a memory remote, shared with every calculator the
/// fixture opens so state survives a reopen.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
    pub remote: Arc<MemoryRemote>,
    pub config: CalculatorConfig,
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_remote(MemoryRemote::new())
    }

    /// Start with a remote that already holds `items`.
    pub fn with_remote_items(items: Vec<HistoryItem>) -> Self {
        Self::with_remote(MemoryRemote::with_items(items))
    }

    fn with_remote(remote: MemoryRemote) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            remote: Arc::new(remote),
            config: CalculatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CalculatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Open a calculator over the fixture's store and remote.
    ///
    /// Must be called inside a tokio runtime for remote calls to be made.
    pub fn calculator(&self) -> Calculator<Arc<MemoryStore>> {
        Calculator::open(
            self.store.clone(),
            Some(self.remote.clone() as Arc<dyn HistoryRemote>),
            self.config.clone(),
        )
    }

    /// Open a calculator over the fixture's store with no remote.
    pub fn offline_calculator(&self) -> Calculator<Arc<MemoryStore>> {
        Calculator::open(self.store.clone(), None, self.config.clone())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
