// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-tier dirty-set plus aggregate pending-byte counter.

use crate::entry_store::EntryStore;
use crate::filesystem::Filesystem;
use crate::flusher;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Dirty-set and pending-byte counter for one priority tier.
pub struct FlushQueue {
    dirty: Mutex<HashSet<String>>,
    pending_bytes: AtomicU64,
}

impl FlushQueue {
    pub fn new() -> Self {
        Self {
            dirty: Mutex::new(HashSet::new()),
            pending_bytes: AtomicU64::new(0),
        }
    }

    /// Idempotent addition to the dirty-set. On the absent-to-present
    /// transition, `pending_bytes` is incremented by `size_hint` — the
    /// entry's current size at the time of marking. Re-marking an
    /// already-dirty path does not re-add its bytes; this is an accepted
    /// approximation, corrected exactly by [`FlushQueue::calculate_dirty_bytes`].
    pub fn mark_dirty(&self, path: &str, size_hint: usize) {
        let mut dirty = self.dirty.lock();
        if dirty.insert(path.to_string()) {
            self.pending_bytes.fetch_add(size_hint as u64, Ordering::AcqRel);
        }
    }

    /// Remove a path from this tier's dirty set without flushing it —
    /// used when a write retargets an entry's priority so it isn't left
    /// double-dirty across tiers.
    pub fn clear(&self, path: &str) {
        self.dirty.lock().remove(path);
    }

    pub fn is_dirty(&self, path: &str) -> bool {
        self.dirty.lock().contains(path)
    }

    /// Snapshot enumerator for introspection.
    pub fn dirty_paths(&self) -> Vec<String> {
        self.dirty.lock().iter().cloned().collect()
    }

    pub fn pending_bytes(&self) -> u64 {
        self.pending_bytes.load(Ordering::Acquire)
    }

    /// Exact pending-byte total, by summing current entry sizes — the
    /// authoritative figure, used to correct the approximate counter.
    pub fn calculate_dirty_bytes(&self, store: &EntryStore) -> u64 {
        self.dirty
            .lock()
            .iter()
            .filter_map(|path| store.peek(path))
            .map(|entry| entry.size_bytes() as u64)
            .sum()
    }

    /// Invoked by a tier's heartbeat. No-op if the dirty-set is empty;
    /// otherwise flushes only once `pending_bytes` crosses `threshold`.
    pub async fn check_flush(
        &self,
        store: &EntryStore,
        fs: &dyn Filesystem,
        threshold: u64,
    ) {
        if self.dirty.lock().is_empty() {
            return;
        }
        if self.pending_bytes() < threshold {
            return;
        }
        self.run_flush(store, fs, false).await;
        self.pending_bytes.store(0, Ordering::Release);
    }

    /// Flush every tier's dirty set regardless of threshold — used at
    /// shutdown and daemon stop, not by a tier's own threshold-driven
    /// heartbeat tick. `force_empty` additionally retires paths that were
    /// skipped for having empty content, rather than leaving them dirty
    /// forever: draining must terminate even though writing a zero-byte
    /// file is explicitly declined.
    pub async fn flush_all(&self, store: &EntryStore, fs: &dyn Filesystem, force_empty: bool) {
        self.run_flush(store, fs, force_empty).await;
        self.pending_bytes.store(0, Ordering::Release);
    }

    async fn run_flush(&self, store: &EntryStore, fs: &dyn Filesystem, force_empty: bool) {
        let snapshot: Vec<String> = self.dirty_paths();

        for path in snapshot {
            match flusher::flush_one(store, fs, &path).await {
                flusher::FlushOutcome::Retired => {
                    self.dirty.lock().remove(&path);
                }
                flusher::FlushOutcome::Requeued => {
                    // Version advanced mid-write; leave dirty for next cycle.
                }
                flusher::FlushOutcome::Skipped => {
                    if force_empty {
                        self.dirty.lock().remove(&path);
                        warn!(
                            path = %path,
                            "dirty entry retired without writing at shutdown (empty or absent content)"
                        );
                    }
                    // Otherwise: absent from the store, or empty content —
                    // stays dirty until shutdown forces it.
                }
                flusher::FlushOutcome::Failed(err) => {
                    warn!(path = %path, error = %err, "flush write failed, path remains dirty");
                }
            }
        }
    }
}

impl Default for FlushQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Tiers sharing a path namespace need to agree on which tier currently
/// owns the dirty mark for a path. Call when a write retargets `path`
/// from `from` to `to`.
pub fn retarget(path: &str, from: &Arc<FlushQueue>, to: &Arc<FlushQueue>, size_hint: usize) {
    if from.is_dirty(path) {
        from.clear(path);
        to.mark_dirty(path, size_hint);
    }
}

#[cfg(test)]
#[path = "flush_queue_tests.rs"]
mod tests;
