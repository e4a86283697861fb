// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat engine: drives a callback at a fixed interval, on one
//! cooperative task per tier, with a guaranteed final tick on
//! cancellation.
//!
//! The callback is a named trait object (`Arc<dyn HeartbeatCallback>`)
//! rather than a boxed closure — the codebase's existing preference for
//! adapter traits over closures (see the session/agent adapters). Since
//! the callback is an `async fn`, panics are caught with
//! `futures::FutureExt::catch_unwind` rather than `std::panic::catch_unwind`,
//! which cannot wrap a future directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use parking_lot::Mutex;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, warn};
use wyrmhold_core::{Clock, ShutdownSignal};

/// A tier's per-tick work. Implementations must not panic across an
/// `.await` point in a way that poisons shared state; panics are caught
/// regardless, but the heartbeat cannot undo partial side effects.
#[async_trait]
pub trait HeartbeatCallback: Send + Sync {
    async fn on_tick(&self, tick: u64);
}

/// Drives one [`HeartbeatCallback`] at a fixed interval on a dedicated task.
pub struct Heartbeat {
    interval: Duration,
    callback: Arc<dyn HeartbeatCallback>,
    clock: Arc<dyn Clock>,
    tick_count: AtomicU64,
    last_tick: Mutex<Option<DateTime<Utc>>>,
    running: Mutex<bool>,
    /// Per-instance stop signal, independent of any process-wide shutdown
    /// signal — `FileDaemon::stop()` must be able to retire a heartbeat
    /// without permanently marking the whole daemon as shut down; the
    /// daemon may `start()` again after `stop()`. Replaced with a fresh
    /// signal on every `start()`, since `ShutdownSignal::request` cannot
    /// be un-requested and the same `Heartbeat` is reused across restarts.
    stop: Mutex<ShutdownSignal>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Heartbeat {
    pub fn new(interval: Duration, callback: Arc<dyn HeartbeatCallback>, clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new(Self {
            interval,
            callback,
            clock,
            tick_count: AtomicU64::new(0),
            last_tick: Mutex::new(None),
            running: Mutex::new(false),
            stop: Mutex::new(ShutdownSignal::new()),
            task: Mutex::new(None),
        })
    }

    /// Idempotent: a heartbeat already running is left untouched.
    pub fn start(self: &Arc<Self>) {
        let mut running = self.running.lock();
        if *running {
            return;
        }
        *running = true;
        *self.stop.lock() = ShutdownSignal::new();

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            this.run().await;
        });
        *self.task.lock() = Some(handle);
    }

    /// Requests cancellation and awaits the final tick. A heartbeat that
    /// was never started, or has already been stopped, returns immediately.
    pub async fn stop(&self) {
        self.stop.lock().request();
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "heartbeat task panicked");
            }
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Acquire)
    }

    pub fn time_since_last_tick(&self) -> Option<Duration> {
        let last = (*self.last_tick.lock())?;
        (self.clock.now() - last).to_std().ok()
    }

    pub fn is_running(&self) -> bool {
        *self.running.lock()
    }

    async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick fires immediately; consume it so the first real
        // tick happens after one full interval, matching "invoke ... at a
        // fixed interval" rather than "invoke immediately, then interval".
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.fire_tick().await;
                }
                _ = self.stop.cancelled() => {
                    // Guaranteed final tick on cancellation.
                    self.fire_tick().await;
                    break;
                }
            }
        }

        *self.running.lock() = false;
    }

    async fn fire_tick(&self) {
        let tick = self.tick_count.fetch_add(1, Ordering::AcqRel) + 1;
        *self.last_tick.lock() = Some(self.clock.now());

        let callback = Arc::clone(&self.callback);
        let result = AssertUnwindSafe(async move { callback.on_tick(tick).await })
            .catch_unwind()
            .await;

        if let Err(panic) = result {
            let message = panic_message(&panic);
            error!(tick, message = %message, "heartbeat callback panicked");
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
