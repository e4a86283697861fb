// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File daemon lifecycle: the public read/write API, priority dispatch,
//! shutdown registration, and the `Stopped -> Starting -> Running ->
//! Stopping -> Stopped` state machine.

use crate::heartbeat::{Heartbeat, HeartbeatCallback};
use crate::status::DaemonStatus;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use wyrmhold_core::{Clock, DaemonError, FilePriority, ShutdownSignal};
use wyrmhold_storage::{EntryStore, Filesystem, FlushQueue};

use crate::config::Config;

/// A single tier's heartbeat work: prune stale entries, then check whether
/// this tier's dirty bytes have crossed the flush threshold.
struct TierHeartbeat {
    store: Arc<EntryStore>,
    queue: Arc<FlushQueue>,
    all_queues: [Arc<FlushQueue>; 3],
    fs: Arc<dyn Filesystem>,
    prune_horizon: std::time::Duration,
    flush_threshold_bytes: u64,
}

#[async_trait]
impl HeartbeatCallback for TierHeartbeat {
    async fn on_tick(&self, _tick: u64) {
        let queues = &self.all_queues;
        self.store.prune_stale(self.prune_horizon, |path| {
            queues.iter().any(|q| q.is_dirty(path))
        });
        self.queue
            .check_flush(&self.store, self.fs.as_ref(), self.flush_threshold_bytes)
            .await;
    }
}

/// The File Daemon: cache, flush queues, and heartbeats for all three
/// priority tiers, behind one public API.
///
/// Entries live in a single shared store rather than one-per-tier: a path
/// names one logical entry regardless of which tier last touched it.
/// Dirtiness, however, stays genuinely per-tier, since flush cadence is a
/// per-tier property.
pub struct FileDaemon {
    config: Config,
    fs: Arc<dyn Filesystem>,
    clock: Arc<dyn Clock>,
    shutdown: ShutdownSignal,
    store: Arc<EntryStore>,
    queues: [Arc<FlushQueue>; 3],
    heartbeats: [Arc<Heartbeat>; 3],
    status: Mutex<DaemonStatus>,
    last_start_time: Mutex<Option<DateTime<Utc>>>,
    shutdown_watcher: Mutex<Option<JoinHandle<()>>>,
}

impl FileDaemon {
    pub fn new(
        config: Config,
        fs: Arc<dyn Filesystem>,
        clock: Arc<dyn Clock>,
        shutdown: ShutdownSignal,
    ) -> Arc<Self> {
        let store = Arc::new(EntryStore::new(Arc::clone(&clock)));
        let queues: [Arc<FlushQueue>; 3] = [
            Arc::new(FlushQueue::new()),
            Arc::new(FlushQueue::new()),
            Arc::new(FlushQueue::new()),
        ];

        let heartbeats: [Arc<Heartbeat>; 3] = std::array::from_fn(|i| {
            let priority = FilePriority::ALL[i];
            let tier = TierHeartbeat {
                store: Arc::clone(&store),
                queue: Arc::clone(&queues[i]),
                all_queues: queues.clone(),
                fs: Arc::clone(&fs),
                prune_horizon: config.prune_horizon(),
                flush_threshold_bytes: config.flush_threshold_bytes(),
            };
            Heartbeat::new(config.interval_for(priority), Arc::new(tier), Arc::clone(&clock))
        });

        Arc::new(Self {
            config,
            fs,
            clock,
            shutdown,
            store,
            queues,
            heartbeats,
            status: Mutex::new(DaemonStatus::Stopped),
            last_start_time: Mutex::new(None),
            shutdown_watcher: Mutex::new(None),
        })
    }

    pub fn status(&self) -> DaemonStatus {
        *self.status.lock()
    }

    pub fn last_start_time(&self) -> Option<DateTime<Utc>> {
        *self.last_start_time.lock()
    }

    fn queue_for(&self, priority: FilePriority) -> &Arc<FlushQueue> {
        match priority {
            FilePriority::SystemFast => &self.queues[0],
            FilePriority::SystemSlow => &self.queues[1],
            FilePriority::Game => &self.queues[2],
        }
    }

    /// Start all three tiers' heartbeats and register for the shared
    /// shutdown signal. Refuses if shutdown has already been requested, or
    /// if called from a state other than `Stopped`/`Error`.
    pub async fn start(self: &Arc<Self>) -> Result<(), DaemonError> {
        {
            let mut status = self.status.lock();
            if !status.can_start() {
                return Err(DaemonError::InvariantViolation(format!(
                    "cannot start from {status}"
                )));
            }
            if self.shutdown.is_requested() {
                return Err(DaemonError::Cancelled);
            }
            *status = DaemonStatus::Starting;
        }

        for heartbeat in &self.heartbeats {
            heartbeat.start();
        }

        let watched = Arc::clone(self);
        let shutdown = self.shutdown.clone();
        let handle = tokio::spawn(async move {
            shutdown.cancelled().await;
            watched.handle_shutdown_signal().await;
        });
        *self.shutdown_watcher.lock() = Some(handle);

        *self.last_start_time.lock() = Some(self.clock.now());
        *self.status.lock() = DaemonStatus::Running;
        info!("file daemon started");
        Ok(())
    }

    /// Invoked when the process-wide shutdown signal fires while running.
    async fn handle_shutdown_signal(self: Arc<Self>) {
        if *self.status.lock() != DaemonStatus::Running {
            return;
        }
        info!("shutdown signal observed, draining tiers");
        *self.status.lock() = DaemonStatus::Stopping;
        self.drain().await;
        *self.status.lock() = DaemonStatus::Stopped;
    }

    /// Flush every tier, then stop every heartbeat (waiting for its final
    /// tick). Called both by an explicit `stop()` and by the shutdown-signal
    /// watcher.
    async fn drain(&self) {
        for queue in &self.queues {
            queue.flush_all(&self.store, self.fs.as_ref(), true).await;
        }
        for heartbeat in &self.heartbeats {
            heartbeat.stop().await;
        }
    }

    /// Explicit stop, independent of the shared shutdown signal — the
    /// daemon may `start()` again afterward.
    pub async fn stop(self: &Arc<Self>) -> Result<(), DaemonError> {
        {
            let mut status = self.status.lock();
            if !status.can_stop() {
                return Err(DaemonError::InvariantViolation(format!(
                    "cannot stop from {status}"
                )));
            }
            *status = DaemonStatus::Stopping;
        }

        self.drain().await;

        if let Some(handle) = self.shutdown_watcher.lock().take() {
            handle.abort();
        }

        *self.status.lock() = DaemonStatus::Stopped;
        info!("file daemon stopped");
        Ok(())
    }

    /// Cache hit returns content directly; a miss performs a filesystem
    /// read and populates the cache clean (no flush-queue entry). Refuses
    /// the filesystem read if shutdown has been observed, returning `None`
    /// rather than stale-but-cached content it does not have.
    pub async fn read(&self, path: &str, priority: FilePriority) -> Option<Vec<u8>> {
        if let Some(entry) = self.store.try_get(path) {
            return entry.content().map(|c| c.to_vec());
        }

        if self.shutdown.is_requested() {
            debug!(path, "read cancelled by shutdown signal");
            return None;
        }

        match self.fs.read(path).await {
            Ok(Some(bytes)) => {
                self.store.set_entry(path, bytes.clone(), priority);
                Some(bytes)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(path, error = %e, "filesystem read failed");
                None
            }
        }
    }

    /// Refuses silently once shutdown has been requested. Otherwise
    /// updates the entry in place and marks it dirty in the tier matching
    /// `priority`, retargeting from any other tier's dirty set so a path
    /// is dirty in at most one tier at a time.
    pub fn write(&self, path: &str, bytes: Vec<u8>, priority: FilePriority) {
        if self.shutdown.is_requested() {
            debug!(path, "write refused: shutdown requested");
            return;
        }

        let size = bytes.len();
        self.store.set_entry(path, bytes, priority);

        let target = self.queue_for(priority);
        for queue in &self.queues {
            if !Arc::ptr_eq(queue, target) {
                queue.clear(path);
            }
        }
        target.mark_dirty(path, size);
    }

    pub fn size_up(&self) -> u64 {
        self.queues
            .iter()
            .map(|q| q.calculate_dirty_bytes(&self.store))
            .sum()
    }

    pub fn files_waiting_to_write(&self) -> Vec<String> {
        self.queues
            .iter()
            .flat_map(|q| q.dirty_paths())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
