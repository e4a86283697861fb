// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios covering the daemon's cross-component behavior,
//! driven entirely through `FileDaemon`'s public API.

use std::sync::Arc;
use std::time::Duration;
use wyrmhold_core::{FakeClock, FilePriority, ShutdownSignal};
use wyrmhold_daemon::{Config, DaemonStatus, FileDaemon};
use wyrmhold_storage::FakeFilesystem;

fn daemon_with(config: Config) -> (Arc<FileDaemon>, Arc<FakeFilesystem>, ShutdownSignal) {
    let fs = Arc::new(FakeFilesystem::new());
    let clock = Arc::new(FakeClock::new());
    let shutdown = ShutdownSignal::new();
    let daemon = FileDaemon::new(config, fs.clone(), clock, shutdown.clone());
    (daemon, fs, shutdown)
}

fn daemon() -> (Arc<FileDaemon>, Arc<FakeFilesystem>, ShutdownSignal) {
    daemon_with(Config::default())
}

#[tokio::test(start_paused = true)]
async fn scenario_a_basic_round_trip() {
    let (daemon, fs, _shutdown) = daemon();
    daemon.start().await.unwrap();

    daemon.write("/x", vec![0x01, 0x02, 0x03], FilePriority::Game);
    // `stop()` performs an unconditional flush_all, standing in for the
    // scenario's bare "call flush_all" against the daemon's public API.
    daemon.stop().await.unwrap();

    assert_eq!(fs.read("/x").await.unwrap(), Some(vec![0x01, 0x02, 0x03]));
    assert_eq!(daemon.size_up(), 0);
}

#[tokio::test(start_paused = true)]
async fn scenario_b_read_miss_populates_cache_clean() {
    let (daemon, fs, _shutdown) = daemon();
    fs.seed("/y", vec![0xAA]);
    daemon.start().await.unwrap();

    let first = daemon.read("/y", FilePriority::Game).await;
    assert_eq!(first, Some(vec![0xAA]));
    assert!(daemon.files_waiting_to_write().is_empty());

    let second = daemon.read("/y", FilePriority::Game).await;
    assert_eq!(second, Some(vec![0xAA]));
    assert_eq!(fs.read_log(), vec!["/y".to_string()], "second read must hit the cache, not the filesystem");

    daemon.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn scenario_c_threshold_driven_flush() {
    let mut config = Config::default();
    config.flush_threshold_bytes = 100;
    let (daemon, fs, _shutdown) = daemon_with(config);
    daemon.start().await.unwrap();

    daemon.write("/a", vec![0; 80], FilePriority::SystemFast);
    daemon.write("/b", vec![0; 30], FilePriority::SystemFast);

    // Trigger the SystemFast heartbeat's callback exactly once.
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(5)).await;
    tokio::task::yield_now().await;

    assert!(fs.read("/a").await.unwrap().is_some());
    assert!(fs.read("/b").await.unwrap().is_some());
    assert!(daemon.files_waiting_to_write().is_empty());
    assert_eq!(daemon.size_up(), 0);

    daemon.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn scenario_d_version_guarded_retirement() {
    let (daemon, fs, _shutdown) = daemon();
    daemon.start().await.unwrap();

    daemon.write("/c", b"X".to_vec(), FilePriority::Game);

    // A concurrent write lands while the write-to-disk is "in flight".
    let racing = Arc::clone(&daemon);
    fs.run_before_next_write(move || {
        racing.write("/c", b"Y".to_vec(), FilePriority::Game);
    });

    daemon.stop().await.unwrap();

    // The in-flight write landed with the stale bytes, and the path is
    // still dirty (re-flush pending) since the version advanced mid-write.
    assert_eq!(fs.read("/c").await.unwrap(), Some(b"X".to_vec()));
    assert_eq!(daemon.files_waiting_to_write(), vec!["/c".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn scenario_e_prune_respects_dirtiness() {
    let mut config = Config::default();
    config.prune_horizon_secs = 60;
    let (daemon, fs, _shutdown) = daemon_with(config);
    daemon.start().await.unwrap();

    daemon.write("/d", vec![1], FilePriority::SystemSlow);

    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(120)).await;
    tokio::task::yield_now().await;

    // Dirty, so the prune inside the tick must have retained it.
    assert_eq!(daemon.read("/d", FilePriority::SystemSlow).await, Some(vec![1]));

    daemon.stop().await.unwrap();
    assert_eq!(fs.read("/d").await.unwrap(), Some(vec![1]));

    // Now clean; advancing well past the horizon should let a later prune
    // evict it (checked indirectly: a subsequent read is a cache miss that
    // goes back to the filesystem).
    daemon.start().await.unwrap();
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(120)).await;
    tokio::task::yield_now().await;

    assert_eq!(fs.read_log().iter().filter(|p| p.as_str() == "/d").count(), 0);
    let _ = daemon.read("/d", FilePriority::SystemSlow).await;
    assert!(
        fs.read_log().iter().any(|p| p == "/d"),
        "entry must have been pruned, forcing a fresh filesystem read"
    );

    daemon.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn scenario_f_shutdown_drains() {
    let (daemon, fs, shutdown) = daemon();
    daemon.start().await.unwrap();

    daemon.write("/a", vec![1], FilePriority::SystemFast);
    daemon.write("/b", vec![2], FilePriority::SystemSlow);
    daemon.write("/c", vec![3], FilePriority::Game);

    shutdown.request();

    // Let the shutdown watcher's drain run to completion.
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    assert_eq!(daemon.status(), DaemonStatus::Stopped);
    assert_eq!(fs.read("/a").await.unwrap(), Some(vec![1]));
    assert_eq!(fs.read("/b").await.unwrap(), Some(vec![2]));
    assert_eq!(fs.read("/c").await.unwrap(), Some(vec![3]));

    // Writes are now silently refused.
    daemon.write("/a", vec![9], FilePriority::SystemFast);
    assert_eq!(fs.read("/a").await.unwrap(), Some(vec![1]));

    // Reads still serve cached content for entries not yet pruned.
    assert_eq!(daemon.read("/a", FilePriority::SystemFast).await, Some(vec![1]));
}
