//! The Calculator: the single owner of the session and the history list.
//!
//! Every user action goes through [`Calculator::press`], which runs the pure
//! transition, applies its effect to the history cache, and writes the
//! session to the store before returning. Remote history calls are spawned
//! onto the tokio runtime that was current when the calculator was opened;
//! their results queue up on a channel until the owner pumps them with
//! [`Calculator::apply_completions`], [`Calculator::next_completion`] or
//! [`Calculator::settle`].

use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use tally_core::{step, Effect, EngineOptions, HistoryEntry, Key, Session, SessionBlob, Step};
use tally_store::{SessionStore, SqliteStore};
use tally_sync::{HistoryItem, HistoryRemote, HttpRemote, SyncConfig, SyncError};

use crate::config::CalculatorConfig;
use crate::error::Result;
use crate::history::{HistoryCache, MirrorStatus};
use crate::mirror::{Completion, Outcome, RemoteCall, Reply};
use crate::notice::{Notice, SyncOperation};

/// What the presentation layer draws after each operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    /// The main display line.
    pub input: String,
    /// The equation preview above it.
    pub equation: String,
    /// History lines, oldest first.
    pub history: Vec<String>,
}

/// The calculator.
pub struct Calculator<S: SessionStore> {
    store: S,
    remote: Option<Arc<dyn HistoryRemote>>,
    runtime: Option<Handle>,
    config: CalculatorConfig,
    options: EngineOptions,

    session: Session,
    history: HistoryCache,
    notices: Vec<Notice>,

    /// Bumped on every history clear; completions from an older epoch are stale.
    epoch: u64,
    in_flight: usize,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<S: SessionStore> Calculator<S> {
    /// Open a calculator over `store`, restoring the saved session and the
    /// local history mirror.
    ///
    /// Pass `None` for `remote` to run offline. With a remote, this must be
    /// called from within a tokio runtime for remote calls to be made.
    /// Unreadable persisted state degrades to defaults.
    pub fn open(
        store: S,
        remote: Option<Arc<dyn HistoryRemote>>,
        config: CalculatorConfig,
    ) -> Self {
        let session = match store.load_session(&config.session_id) {
            Ok(Some(blob)) => blob.restore(),
            Ok(None) => Session::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load session; starting from defaults");
                Session::default()
            }
        };

        let history = match store.load_history() {
            Ok(entries) => HistoryCache::from_entries(entries),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load history mirror; starting empty");
                HistoryCache::new()
            }
        };

        let runtime = Handle::try_current().ok();
        if remote.is_some() && runtime.is_none() {
            tracing::warn!("no tokio runtime; remote history calls will be skipped");
        }

        tracing::debug!(
            session_id = %config.session_id,
            history = history.len(),
            online = remote.is_some(),
            "opened calculator"
        );

        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let options = config.engine_options();
        Self {
            store,
            remote,
            runtime,
            config,
            options,
            session,
            history,
            notices: Vec::new(),
            epoch: 0,
            in_flight: 0,
            completions_tx,
            completions_rx,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply one key.
    ///
    /// Local state is fully updated and saved when this returns; any remote
    /// call it triggers is only dispatched.
    pub fn press(&mut self, key: Key) {
        let Step { session, effect } = step(std::mem::take(&mut self.session), key, &self.options);
        self.session = session;

        let call = match effect {
            Some(Effect::Record(entry)) => Some(self.record_locally(entry)),
            Some(Effect::ClearHistory) => Some(self.clear_locally()),
            None => None,
        };

        self.save_session();

        if let Some(call) = call {
            self.dispatch(call);
        }
    }

    pub fn press_all(&mut self, keys: impl IntoIterator<Item = Key>) {
        for key in keys {
            self.press(key);
        }
    }

    /// Ask the remote for its full history.
    ///
    /// On success the snapshot replaces the local list, keeping entries the
    /// snapshot lacks that were recorded since this call or are still being
    /// appended. On failure the local list stays as it is.
    pub fn refresh_history(&mut self) {
        let since = self.history.next_seq();
        self.dispatch(RemoteCall::Refresh { since });
    }

    fn record_locally(&mut self, entry: HistoryEntry) -> RemoteCall {
        let status = if self.can_sync() {
            MirrorStatus::Pending
        } else {
            MirrorStatus::Local
        };
        self.history.record(entry.clone(), status);
        if let Err(e) = self.store.append_history(&entry) {
            self.persistence_failed(e.to_string());
        }
        RemoteCall::Append(HistoryItem::from(&entry))
    }

    fn clear_locally(&mut self) -> RemoteCall {
        self.history.clear();
        self.epoch += 1;
        if let Err(e) = self.store.clear_history() {
            self.persistence_failed(e.to_string());
        }
        RemoteCall::Clear
    }

    fn save_session(&mut self) {
        let blob = SessionBlob::capture(&self.session);
        if let Err(e) = self.store.save_session(&self.config.session_id, &blob) {
            self.persistence_failed(e.to_string());
        }
    }

    fn persistence_failed(&mut self, reason: String) {
        tracing::warn!(%reason, "durable write failed");
        self.notices.push(Notice::PersistenceFailed { reason });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Remote calls
    // ─────────────────────────────────────────────────────────────────────────

    fn can_sync(&self) -> bool {
        self.remote.is_some() && self.runtime.is_some()
    }

    /// Spawn a remote call. Offline calculators skip it.
    fn dispatch(&mut self, call: RemoteCall) {
        let Some(remote) = self.remote.clone() else {
            return;
        };
        let operation = call.operation();
        let Some(runtime) = self.runtime.as_ref() else {
            self.notices.push(Notice::SyncUnavailable {
                operation,
                reason: SyncError::Unavailable("no async runtime".into()).to_string(),
            });
            return;
        };

        let epoch = self.epoch;
        let reply = Reply::new(self.completions_tx.clone(), epoch, call.clone());
        runtime.spawn(async move {
            let outcome = call.run(remote.as_ref()).await;
            reply.send(outcome);
        });
        self.in_flight += 1;
        tracing::debug!(%operation, epoch, "dispatched remote call");
    }

    /// Apply every completion that has already arrived. Never waits.
    ///
    /// Returns the number applied.
    pub fn apply_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns false immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.completions_rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Wait until every dispatched call has completed and been applied.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let Completion { epoch, outcome } = completion;

        match outcome {
            Outcome::Cleared { result: Ok(()) } => {
                tracing::debug!("remote history cleared");
            }
            Outcome::Cleared { result: Err(e) } => {
                self.sync_failed(SyncOperation::Clear, e);
            }
            Outcome::Appended { .. } | Outcome::Refreshed { .. } if epoch != self.epoch => {
                tracing::debug!(
                    epoch,
                    current = self.epoch,
                    "discarding completion from before a history clear"
                );
            }
            Outcome::Appended { sent, result } => {
                let entry = HistoryEntry::from(sent.clone());
                match result {
                    Ok(echo) => {
                        if echo != sent {
                            tracing::debug!(?echo, ?sent, "remote echo differs; keeping local entry");
                        }
                        if !self.history.mark_mirrored(&entry) {
                            tracing::debug!(entry = %entry, "no pending entry for echo");
                        }
                    }
                    Err(e) => {
                        self.history.mark_failed(&entry);
                        self.sync_failed(SyncOperation::Append, e);
                    }
                }
            }
            Outcome::Refreshed { since, result } => match result {
                Ok(items) => {
                    let snapshot: Vec<HistoryEntry> =
                        items.into_iter().map(HistoryEntry::from).collect();
                    let fetched = snapshot.len();
                    let kept = self.history.replace_with_snapshot(snapshot, since);
                    tracing::info!(fetched, kept, "history refreshed from remote");
                    if let Err(e) = self.store.replace_history(&self.history.to_entries()) {
                        self.persistence_failed(e.to_string());
                    }
                }
                Err(e) => self.sync_failed(SyncOperation::Refresh, e),
            },
        }
    }

    fn sync_failed(&mut self, operation: SyncOperation, error: SyncError) {
        tracing::warn!(%operation, error = %error, "remote history unavailable");
        self.notices.push(Notice::SyncUnavailable {
            operation,
            reason: error.to_string(),
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Observation
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot for the presentation layer.
    pub fn render(&self) -> RenderModel {
        RenderModel {
            input: self.session.input_text(),
            equation: self.session.equation_text(),
            history: self.history.lines(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    /// Remote calls dispatched whose completions have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Take all pending notices, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }
}

impl Calculator<SqliteStore> {
    /// Open a calculator backed by a SQLite file, with an HTTP remote when
    /// `sync` is given.
    pub fn open_sqlite(
        path: impl AsRef<Path>,
        sync: Option<&SyncConfig>,
        config: CalculatorConfig,
    ) -> Result<Self> {
        let store = SqliteStore::open(path)?;
        let remote = match sync {
            Some(sync) => Some(Arc::new(HttpRemote::new(sync)?) as Arc<dyn HistoryRemote>),
            None => None,
        };
        Ok(Self::open(store, remote, config))
    }
}
