// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The cached file entry record.

use crate::priority::FilePriority;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single cached file.
///
/// Invariants (enforced by the constructors below, never by callers
/// mutating fields directly — all fields are private):
/// 1. `version` is strictly increasing for the entry's lifetime.
/// 2. `size_bytes() == content.len()` (0 before first assignment).
/// 3. `last_access` is UTC and never precedes `created_at`.
/// 4. `path` is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    path: String,
    content: Option<Vec<u8>>,
    priority: FilePriority,
    version: u64,
    created_at: DateTime<Utc>,
    last_access: DateTime<Utc>,
}

impl FileEntry {
    /// Create a brand-new entry at version 1. Used by `set_entry` when a
    /// path has no prior entry.
    pub fn new(
        path: impl Into<String>,
        content: Vec<u8>,
        priority: FilePriority,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            path: path.into(),
            content: Some(content),
            priority,
            version: 1,
            created_at: now,
            last_access: now,
        }
    }

    /// Create an entry whose content hasn't been assigned yet.
    ///
    /// Not currently produced by any public operation (read-miss and write
    /// both supply content immediately) but kept as the documented
    /// nullable-only-before-first-assignment state.
    #[cfg(any(test, feature = "test-support"))]
    pub fn uninitialized(path: impl Into<String>, priority: FilePriority, now: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            content: None,
            priority,
            version: 0,
            created_at: now,
            last_access: now,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    pub fn priority(&self) -> FilePriority {
        self.priority
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_access(&self) -> DateTime<Utc> {
        self.last_access
    }

    /// Length of the current content; 0 if uninitialized.
    pub fn size_bytes(&self) -> usize {
        self.content.as_ref().map_or(0, Vec::len)
    }

    /// Update content in place: increments `version`, updates `last_access`,
    /// and retargets `priority` — a write may move an entry to a different
    /// tier. Never decrements version, never rewinds `last_access`.
    pub fn update_content(&mut self, content: Vec<u8>, priority: FilePriority, now: DateTime<Utc>) {
        self.content = Some(content);
        self.priority = priority;
        self.version += 1;
        self.last_access = now;
    }

    /// Touch `last_access` without changing content or version (read hit).
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_access = now;
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
