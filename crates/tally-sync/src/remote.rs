//! Remote abstraction for the history mirror.
//!
//! The remote layer handles request encoding and delivery.
//! Implementations may use HTTP or anything else that offers the same
//! three operations.

use async_trait::async_trait;

use crate::error::Result;
use crate::item::HistoryItem;

/// The remote history store.
///
/// Implementations must be thread-safe (Send + Sync): calls are issued from
/// background tasks.
#[async_trait]
pub trait HistoryRemote: Send + Sync {
    /// Fetch every stored item, oldest first.
    async fn fetch_all(&self) -> Result<Vec<HistoryItem>>;

    /// Store one item and return the stored copy as the remote echoes it.
    async fn append(&self, item: &HistoryItem) -> Result<HistoryItem>;

    /// Delete every stored item.
    async fn clear_all(&self) -> Result<()>;
}

/// A simple in-memory remote for testing.
///
/// Requests can be held back with [`MemoryRemote::pause`] so tests can
/// interleave local operations with in-flight requests, and failed with
/// [`MemoryRemote::fail_with`].
pub mod memory {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use tokio::sync::watch;

    use crate::error::SyncError;

    /// In-memory remote implementation.
    pub struct MemoryRemote {
        items: Mutex<Vec<HistoryItem>>,
        outage: Mutex<Option<SyncError>>,
        paused: watch::Sender<bool>,
        appends_paused: watch::Sender<bool>,
        appends: AtomicUsize,
        fetches: AtomicUsize,
        clears: AtomicUsize,
    }

    impl MemoryRemote {
        /// Create an empty remote.
        pub fn new() -> Self {
            Self::with_items(Vec::new())
        }

        /// Create a remote that already holds `items`.
        pub fn with_items(items: Vec<HistoryItem>) -> Self {
            let (paused, _) = watch::channel(false);
            let (appends_paused, _) = watch::channel(false);
            Self {
                items: Mutex::new(items),
                outage: Mutex::new(None),
                paused,
                appends_paused,
                appends: AtomicUsize::new(0),
                fetches: AtomicUsize::new(0),
                clears: AtomicUsize::new(0),
            }
        }

        /// Fail every request that completes from now on with `error`.
        pub fn fail_with(&self, error: SyncError) {
            *lock(&self.outage) = Some(error);
        }

        /// Stop failing requests.
        pub fn recover(&self) {
            *lock(&self.outage) = None;
        }

        /// Hold all requests, new and in flight, until [`resume`](Self::resume).
        pub fn pause(&self) {
            self.paused.send_replace(true);
        }

        pub fn resume(&self) {
            self.paused.send_replace(false);
        }

        /// Hold append requests only. Fetches and clears still go through.
        pub fn pause_appends(&self) {
            self.appends_paused.send_replace(true);
        }

        pub fn resume_appends(&self) {
            self.appends_paused.send_replace(false);
        }

        /// Snapshot of the stored items.
        pub fn items(&self) -> Vec<HistoryItem> {
            lock(&self.items).clone()
        }

        /// Number of append requests received, successful or not.
        pub fn append_calls(&self) -> usize {
            self.appends.load(Ordering::SeqCst)
        }

        pub fn fetch_calls(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        pub fn clear_calls(&self) -> usize {
            self.clears.load(Ordering::SeqCst)
        }

        /// Wait while paused, then apply any scripted outage.
        async fn admit(&self) -> Result<()> {
            wait_unpaused(&self.paused).await?;

            match lock(&self.outage).clone() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }

    impl Default for MemoryRemote {
        fn default() -> Self {
            Self::new()
        }
    }

    async fn wait_unpaused(switch: &watch::Sender<bool>) -> Result<()> {
        let mut paused = switch.subscribe();
        paused
            .wait_for(|paused| !*paused)
            .await
            .map_err(|_| SyncError::Unavailable("remote shut down".into()))?;
        Ok(())
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[async_trait]
    impl HistoryRemote for MemoryRemote {
        async fn fetch_all(&self) -> Result<Vec<HistoryItem>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.admit().await?;
            Ok(self.items())
        }

        async fn append(&self, item: &HistoryItem) -> Result<HistoryItem> {
            self.appends.fetch_add(1, Ordering::SeqCst);
            wait_unpaused(&self.appends_paused).await?;
            self.admit().await?;
            lock(&self.items).push(item.clone());
            Ok(item.clone())
        }

        async fn clear_all(&self) -> Result<()> {
            self.clears.fetch_add(1, Ordering::SeqCst);
            self.admit().await?;
            lock(&self.items).clear();
            Ok(())
        }
    }
}
