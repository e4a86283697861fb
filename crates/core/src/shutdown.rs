// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide shutdown signal.
//!
//! A single owning handle, passed explicitly to every component at
//! construction rather than kept as a global. Built on `tokio::sync::Notify`
//! the same way the daemon binary already coordinates its own shutdown path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Cancellation token observable by any task.
///
/// `request()` is idempotent: calling it more than once does not re-notify
/// waiters that already observed the first call, but any waiter that has
/// not yet observed it still will.
#[derive(Clone)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownSignal {
    /// A fresh, not-yet-requested signal.
    pub fn new() -> Self {
        Self {
            requested: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// True if shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Request shutdown and wake every waiter.
    ///
    /// `notify_waiters` only reaches tasks already parked in `cancelled()`;
    /// the `requested` flag covers tasks that check afterward.
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    /// Resolves immediately if shutdown has already been requested;
    /// otherwise waits until [`ShutdownSignal::request`] is called.
    pub async fn cancelled(&self) {
        if self.is_requested() {
            return;
        }
        // Register for notification before re-checking the flag, closing the
        // race where `request()` runs between our check and the `notified()` await.
        let notified = self.notify.notified();
        if self.is_requested() {
            return;
        }
        notified.await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
