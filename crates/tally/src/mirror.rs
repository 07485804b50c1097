//! Remote calls and the completions they post back.
//!
//! A call runs on a spawned task and sends exactly one [`Completion`] to the
//! calculator's channel, through a [`Reply`]. The calculator applies it only
//! when its owner pumps completions, so remote results never touch local
//! state concurrently.

use tokio::sync::mpsc;

use tally_sync::{HistoryItem, HistoryRemote, SyncError};

use crate::notice::SyncOperation;

/// A request for the remote.
#[derive(Debug, Clone)]
pub(crate) enum RemoteCall {
    Append(HistoryItem),
    /// Fetch everything. `since` is the first local sequence number the
    /// fetch could not have seen.
    Refresh { since: u64 },
    Clear,
}

impl RemoteCall {
    pub(crate) fn operation(&self) -> SyncOperation {
        match self {
            RemoteCall::Append(_) => SyncOperation::Append,
            RemoteCall::Refresh { .. } => SyncOperation::Refresh,
            RemoteCall::Clear => SyncOperation::Clear,
        }
    }

    pub(crate) async fn run(self, remote: &dyn HistoryRemote) -> Outcome {
        match self {
            RemoteCall::Append(item) => {
                let result = remote.append(&item).await;
                Outcome::Appended { sent: item, result }
            }
            RemoteCall::Refresh { since } => Outcome::Refreshed {
                since,
                result: remote.fetch_all().await,
            },
            RemoteCall::Clear => Outcome::Cleared {
                result: remote.clear_all().await,
            },
        }
    }

    /// The failed outcome reported when the task running this call went away
    /// without an answer.
    pub(crate) fn abandoned(self) -> Outcome {
        let error = SyncError::Unavailable("remote call did not complete".into());
        match self {
            RemoteCall::Append(item) => Outcome::Appended {
                sent: item,
                result: Err(error),
            },
            RemoteCall::Refresh { since } => Outcome::Refreshed {
                since,
                result: Err(error),
            },
            RemoteCall::Clear => Outcome::Cleared { result: Err(error) },
        }
    }
}

/// What a remote call produced.
#[derive(Debug)]
pub(crate) enum Outcome {
    Appended {
        sent: HistoryItem,
        result: Result<HistoryItem, SyncError>,
    },
    Refreshed {
        since: u64,
        result: Result<Vec<HistoryItem>, SyncError>,
    },
    Cleared {
        result: Result<(), SyncError>,
    },
}

/// An outcome tagged with the history epoch it was dispatched in.
#[derive(Debug)]
pub(crate) struct Completion {
    pub(crate) epoch: u64,
    pub(crate) outcome: Outcome,
}

/// The sending half of one dispatched call.
///
/// Dropped without [`send`](Reply::send), when the task panicked or the
/// runtime shut down, it posts the call's abandoned outcome instead, so the
/// calculator's in-flight count always comes back down.
pub(crate) struct Reply {
    tx: mpsc::UnboundedSender<Completion>,
    epoch: u64,
    pending: Option<RemoteCall>,
}

impl Reply {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Completion>, epoch: u64, call: RemoteCall) -> Self {
        Self {
            tx,
            epoch,
            pending: Some(call),
        }
    }

    pub(crate) fn send(mut self, outcome: Outcome) {
        self.pending = None;
        self.deliver(outcome);
    }

    fn deliver(&self, outcome: Outcome) {
        let completion = Completion {
            epoch: self.epoch,
            outcome,
        };
        if self.tx.send(completion).is_err() {
            tracing::debug!("calculator closed; dropping remote completion");
        }
    }
}

impl Drop for Reply {
    fn drop(&mut self) {
        if let Some(call) = self.pending.take() {
            tracing::warn!(operation = %call.operation(), "remote call abandoned");
            self.deliver(call.abandoned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_dropped_unsent_posts_abandoned_outcome() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let call = RemoteCall::Append(HistoryItem::new("3 + 4", "7"));
        drop(Reply::new(tx, 2, call));

        let completion = rx.try_recv().unwrap();
        assert_eq!(completion.epoch, 2);
        match completion.outcome {
            Outcome::Appended { sent, result } => {
                assert_eq!(sent, HistoryItem::new("3 + 4", "7"));
                assert!(matches!(result, Err(SyncError::Unavailable(_))));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_reply_sends_exactly_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reply = Reply::new(tx, 0, RemoteCall::Clear);
        reply.send(Outcome::Cleared { result: Ok(()) });

        assert!(matches!(
            rx.try_recv().unwrap().outcome,
            Outcome::Cleared { result: Ok(()) }
        ));
        assert!(rx.try_recv().is_err());
    }
}
