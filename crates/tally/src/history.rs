//! The rendered history list and its mirror bookkeeping.
//!
//! The cache is the source of truth for what the user sees. Each entry
//! carries a [`MirrorStatus`] saying whether the remote is known to hold a
//! copy. Entries are matched by identity (expression and result text), never
//! by position, because remote completions arrive in any order relative to
//! local input.

use std::collections::HashMap;

use tally_core::HistoryEntry;

/// What is known about the remote copy of a cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorStatus {
    /// An append request is in flight.
    Pending,
    /// The remote holds this entry.
    Mirrored,
    /// Local only: no remote, the append failed, or the entry was loaded
    /// from the local mirror at startup.
    Local,
}

#[derive(Debug, Clone)]
struct Cached {
    entry: HistoryEntry,
    status: MirrorStatus,
    /// Local insertion counter, used to tell which entries were recorded
    /// after a refresh was dispatched.
    seq: u64,
}

/// Ordered history, oldest first.
#[derive(Debug, Clone, Default)]
pub struct HistoryCache {
    entries: Vec<Cached>,
    next_seq: u64,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache from the durable local mirror.
    pub fn from_entries(entries: impl IntoIterator<Item = HistoryEntry>) -> Self {
        let mut cache = Self::new();
        for entry in entries {
            cache.record(entry, MirrorStatus::Local);
        }
        cache
    }

    /// Append an entry. Always succeeds.
    pub fn record(&mut self, entry: HistoryEntry, status: MirrorStatus) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Cached { entry, status, seq });
        seq
    }

    /// The sequence number the next recorded entry will get.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Mark the oldest pending entry equal to `entry` as mirrored.
    ///
    /// Returns false when no pending entry matches; nothing is added either way.
    pub fn mark_mirrored(&mut self, entry: &HistoryEntry) -> bool {
        self.settle_pending(entry, MirrorStatus::Mirrored)
    }

    /// Mark the oldest pending entry equal to `entry` as local only.
    pub fn mark_failed(&mut self, entry: &HistoryEntry) -> bool {
        self.settle_pending(entry, MirrorStatus::Local)
    }

    fn settle_pending(&mut self, entry: &HistoryEntry, status: MirrorStatus) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|c| c.status == MirrorStatus::Pending && c.entry == *entry)
        {
            Some(cached) => {
                cached.status = status;
                true
            }
            None => false,
        }
    }

    /// Replace the contents with a remote snapshot.
    ///
    /// Entries recorded locally at or after `since` were not visible to the
    /// request that produced the snapshot, and pending entries may have
    /// reached the remote after it answered. Each of them is kept, after the
    /// snapshot, unless the snapshot already holds an unclaimed copy of it.
    /// Returns the number of local entries kept.
    pub fn replace_with_snapshot(&mut self, snapshot: Vec<HistoryEntry>, since: u64) -> usize {
        let kept: Vec<Cached> = {
            let mut unclaimed: HashMap<&HistoryEntry, usize> = HashMap::new();
            for entry in &snapshot {
                *unclaimed.entry(entry).or_default() += 1;
            }

            let mut kept = Vec::new();
            for cached in self
                .entries
                .iter()
                .filter(|c| c.seq >= since || c.status == MirrorStatus::Pending)
            {
                match unclaimed.get_mut(&cached.entry) {
                    Some(count) if *count > 0 => *count -= 1,
                    _ => kept.push(cached.clone()),
                }
            }
            kept
        };

        let mut entries = Vec::with_capacity(snapshot.len() + kept.len());
        for entry in snapshot {
            let seq = self.next_seq;
            self.next_seq += 1;
            entries.push(Cached {
                entry,
                status: MirrorStatus::Mirrored,
                seq,
            });
        }
        let kept_count = kept.len();
        entries.extend(kept);
        self.entries = entries;
        kept_count
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().map(|c| &c.entry)
    }

    /// Entries paired with their mirror status.
    pub fn statuses(&self) -> impl Iterator<Item = (&HistoryEntry, MirrorStatus)> {
        self.entries.iter().map(|c| (&c.entry, c.status))
    }

    pub fn to_entries(&self) -> Vec<HistoryEntry> {
        self.entries().cloned().collect()
    }

    /// Rendered lines, `"{expression} = {result}"`.
    pub fn lines(&self) -> Vec<String> {
        self.entries().map(HistoryEntry::line).collect()
    }
}
