// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wyrmhold-storage: per-tier entry cache, flush queues, and the
//! version-guarded write-back algorithm that sits behind a [`FileDaemon`].
//!
//! [`FileDaemon`]: https://docs.rs/wyrmhold-daemon

pub mod entry_store;
pub mod filesystem;
pub mod flush_queue;
pub mod flusher;

pub use entry_store::EntryStore;
pub use filesystem::{Filesystem, FsError, RealFilesystem};
pub use flush_queue::{retarget, FlushQueue};
pub use flusher::{flush_one, FlushOutcome};

#[cfg(any(test, feature = "test-support"))]
pub use filesystem::FakeFilesystem;
