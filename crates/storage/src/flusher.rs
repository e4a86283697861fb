// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Internal flush algorithm: version-guarded write-back.
//!
//! This is the central correctness property of the whole daemon: a write
//! that began before a mutation must never silently erase the dirtiness of
//! newer content. `flush_one` captures `version_at_start`, writes, and only
//! retires the path if the version hasn't moved since.

use crate::entry_store::EntryStore;
use crate::filesystem::Filesystem;

/// What happened to a single path during one flush attempt.
#[derive(Debug)]
pub enum FlushOutcome {
    /// Write succeeded and the version hadn't advanced — safe to retire.
    Retired,
    /// Write succeeded but a concurrent write advanced the version first;
    /// the path stays dirty for the next flush cycle.
    Requeued,
    /// Entry absent from the store, or content empty — zero-byte files are
    /// never materialized, so an entry written with empty content never
    /// retires via this path.
    Skipped,
    /// The filesystem write failed; the path stays dirty for retry.
    Failed(String),
}

/// Attempt to flush a single path. Does not touch the dirty-set itself —
/// callers (the flush queue) decide what to do with the outcome, since the
/// queue owns the dirty-set's lock lifetime.
pub async fn flush_one(store: &EntryStore, fs: &dyn Filesystem, path: &str) -> FlushOutcome {
    let Some(entry) = store.peek(path) else {
        return FlushOutcome::Skipped;
    };

    let version_at_start = entry.version();
    let Some(content) = entry.content() else {
        return FlushOutcome::Skipped;
    };
    if content.is_empty() {
        return FlushOutcome::Skipped;
    }
    let content = content.to_vec();

    match fs.write(path, &content).await {
        Ok(()) => match store.peek(path) {
            Some(current) if current.version() == version_at_start => FlushOutcome::Retired,
            Some(_) => FlushOutcome::Requeued,
            // Entry vanished mid-flush (pruned); nothing left to retire.
            None => FlushOutcome::Retired,
        },
        Err(err) => FlushOutcome::Failed(err.to_string()),
    }
}

#[cfg(test)]
#[path = "flusher_tests.rs"]
mod tests;
