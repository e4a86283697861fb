// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent mapping from path to [`FileEntry`].
//!
//! Uses a `parking_lot::RwLock<HashMap<...>>` rather than a global lock or
//! an external concurrent-map crate: this store is its own
//! independently-lockable structure, no single global lock protecting
//! everything, which is exactly the `parking_lot` idiom this codebase
//! already leans on everywhere else.

use chrono::Duration as ChronoDuration;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use wyrmhold_core::{Clock, FileEntry, FilePriority};

/// Per-tier cache of file entries.
pub struct EntryStore {
    entries: RwLock<HashMap<String, FileEntry>>,
    clock: Arc<dyn Clock>,
}

impl EntryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Constant-time concurrent lookup; touches `last_access` on hit.
    pub fn try_get(&self, path: &str) -> Option<FileEntry> {
        let mut entries = self.entries.write();
        let entry = entries.get_mut(path)?;
        entry.touch(self.clock.now());
        Some(entry.clone())
    }

    /// Read without touching `last_access` — used internally by the
    /// flusher, which must not perturb prune eligibility just by flushing.
    pub fn peek(&self, path: &str) -> Option<FileEntry> {
        self.entries.read().get(path).cloned()
    }

    /// Insert or update atomically. Returns the entry's
    /// version after the update, so callers (the flush queue) can record
    /// `version_at_start` without a second lock acquisition racing a
    /// concurrent write.
    pub fn set_entry(&self, path: &str, content: Vec<u8>, priority: FilePriority) -> u64 {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        match entries.get_mut(path) {
            Some(entry) => {
                entry.update_content(content, priority, now);
                entry.version()
            }
            None => {
                let entry = FileEntry::new(path, content, priority, now);
                let version = entry.version();
                entries.insert(path.to_string(), entry);
                version
            }
        }
    }

    /// Remove every entry whose `last_access` precedes `now - max_age`,
    /// except those for which `is_dirty` returns true — removing a dirty
    /// entry would orphan a pending write.
    pub fn prune_stale(&self, max_age: std::time::Duration, is_dirty: impl Fn(&str) -> bool) {
        let horizon = self.clock.now()
            - ChronoDuration::from_std(max_age).unwrap_or_else(|_| ChronoDuration::zero());

        let mut entries = self.entries.write();
        entries.retain(|path, entry| entry.last_access() >= horizon || is_dirty(path));
    }

    /// Number of entries currently held (for introspection/tests).
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "entry_store_tests.rs"]
mod tests;
