// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Priority tier: the closed enumeration that partitions the cache.
//!
//! Each tier owns an independent flush queue and heartbeat; entries
//! themselves live in one shared store regardless of tier (see
//! `wyrmhold_daemon::FileDaemon`). Priority controls which heartbeat is
//! responsible for a path's eventual write-back and eviction — not
//! urgency among concurrent writes.

use serde::{Deserialize, Serialize};

/// One of the three fixed priority classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePriority {
    /// Fastest flush cadence; default 5s heartbeat.
    SystemFast,
    /// Default 60s heartbeat.
    SystemSlow,
    /// Default 30s heartbeat.
    Game,
}

impl FilePriority {
    /// All tiers, in a stable order used for iteration (not urgency).
    pub const ALL: [FilePriority; 3] = [
        FilePriority::SystemFast,
        FilePriority::SystemSlow,
        FilePriority::Game,
    ];

    /// Short identifier used in log fields and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilePriority::SystemFast => "system_fast",
            FilePriority::SystemSlow => "system_slow",
            FilePriority::Game => "game",
        }
    }
}

impl std::fmt::Display for FilePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[path = "priority_tests.rs"]
mod tests;
