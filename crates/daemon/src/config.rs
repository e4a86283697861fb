// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! `toml` has no native duration type, so intervals are expressed in the
//! file as plain seconds and converted to `Duration` at the call site.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use wyrmhold_core::FilePriority;

const DEFAULT_FLUSH_THRESHOLD_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_SYSTEM_FAST_INTERVAL_SECS: u64 = 5;
const DEFAULT_SYSTEM_SLOW_INTERVAL_SECS: u64 = 60;
const DEFAULT_GAME_INTERVAL_SECS: u64 = 30;
const DEFAULT_PRUNE_HORIZON_SECS: u64 = 30 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub flush_threshold_bytes: u64,
    pub system_fast_interval_secs: u64,
    pub system_slow_interval_secs: u64,
    pub game_interval_secs: u64,
    pub prune_horizon_secs: u64,
}

impl Config {
    /// Load from a TOML file at `path`; falls back to [`Default::default`]
    /// if the file does not exist, so the daemon can start with zero
    /// configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(ConfigError::Parse),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    pub fn flush_threshold_bytes(&self) -> u64 {
        self.flush_threshold_bytes
    }

    pub fn prune_horizon(&self) -> Duration {
        Duration::from_secs(self.prune_horizon_secs)
    }

    /// Heartbeat interval for the given tier.
    pub fn interval_for(&self, priority: FilePriority) -> Duration {
        let secs = match priority {
            FilePriority::SystemFast => self.system_fast_interval_secs,
            FilePriority::SystemSlow => self.system_slow_interval_secs,
            FilePriority::Game => self.game_interval_secs,
        };
        Duration::from_secs(secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flush_threshold_bytes: DEFAULT_FLUSH_THRESHOLD_BYTES,
            system_fast_interval_secs: DEFAULT_SYSTEM_FAST_INTERVAL_SECS,
            system_slow_interval_secs: DEFAULT_SYSTEM_SLOW_INTERVAL_SECS,
            game_interval_secs: DEFAULT_GAME_INTERVAL_SECS,
            prune_horizon_secs: DEFAULT_PRUNE_HORIZON_SECS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(toml::de::Error),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
