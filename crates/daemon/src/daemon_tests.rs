// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;
use wyrmhold_core::FakeClock;
use wyrmhold_storage::FakeFilesystem;

fn test_daemon() -> (Arc<FileDaemon>, Arc<FakeFilesystem>, ShutdownSignal) {
    let fs = Arc::new(FakeFilesystem::new());
    let clock = Arc::new(FakeClock::new());
    let shutdown = ShutdownSignal::new();
    let daemon = FileDaemon::new(Config::default(), fs.clone(), clock, shutdown.clone());
    (daemon, fs, shutdown)
}

#[tokio::test(start_paused = true)]
async fn start_transitions_to_running() {
    let (daemon, _fs, _shutdown) = test_daemon();
    daemon.start().await.unwrap();
    assert_eq!(daemon.status(), DaemonStatus::Running);
    assert!(daemon.last_start_time().is_some());
    daemon.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn start_refuses_when_not_stopped_or_error() {
    let (daemon, _fs, _shutdown) = test_daemon();
    daemon.start().await.unwrap();

    let result = daemon.start().await;
    assert!(matches!(result, Err(DaemonError::InvariantViolation(_))));

    daemon.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn start_refuses_if_shutdown_already_requested() {
    let (daemon, _fs, shutdown) = test_daemon();
    shutdown.request();

    let result = daemon.start().await;
    assert!(matches!(result, Err(DaemonError::Cancelled)));
    assert_eq!(daemon.status(), DaemonStatus::Stopped);
}

#[tokio::test(start_paused = true)]
async fn stop_refuses_unless_running() {
    let (daemon, _fs, _shutdown) = test_daemon();
    let result = daemon.stop().await;
    assert!(matches!(result, Err(DaemonError::InvariantViolation(_))));
}

#[tokio::test(start_paused = true)]
async fn write_then_read_roundtrips_from_cache() {
    let (daemon, _fs, _shutdown) = test_daemon();
    daemon.start().await.unwrap();

    daemon.write("/x", vec![1, 2, 3], FilePriority::Game);
    let content = daemon.read("/x", FilePriority::Game).await;

    assert_eq!(content, Some(vec![1, 2, 3]));
    daemon.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn read_miss_populates_cache_clean() {
    let (daemon, fs, _shutdown) = test_daemon();
    fs.seed("/y", vec![0xAA]);
    daemon.start().await.unwrap();

    let content = daemon.read("/y", FilePriority::Game).await;
    assert_eq!(content, Some(vec![0xAA]));
    assert!(daemon.files_waiting_to_write().is_empty(), "read-miss must not dirty the path");

    daemon.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn write_refused_after_shutdown_requested() {
    let (daemon, fs, shutdown) = test_daemon();
    daemon.start().await.unwrap();
    shutdown.request();
    tokio::task::yield_now().await;

    daemon.write("/x", vec![9], FilePriority::Game);

    assert!(daemon.files_waiting_to_write().is_empty());
    assert!(fs.read("/x").await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn write_at_new_priority_retargets_away_from_old_tier() {
    let (daemon, _fs, _shutdown) = test_daemon();
    daemon.start().await.unwrap();

    daemon.write("/x", vec![1], FilePriority::SystemFast);
    assert_eq!(daemon.files_waiting_to_write(), vec!["/x".to_string()]);

    daemon.write("/x", vec![2], FilePriority::Game);
    // Still exactly one dirty mark for the path, now owned by the new tier.
    assert_eq!(daemon.files_waiting_to_write(), vec!["/x".to_string()]);

    daemon.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn size_up_reflects_dirty_bytes_across_tiers() {
    let (daemon, _fs, _shutdown) = test_daemon();
    daemon.start().await.unwrap();

    daemon.write("/a", vec![0; 10], FilePriority::SystemFast);
    daemon.write("/b", vec![0; 5], FilePriority::Game);

    assert_eq!(daemon.size_up(), 15);
    daemon.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn stop_flushes_every_tier() {
    let (daemon, fs, _shutdown) = test_daemon();
    daemon.start().await.unwrap();

    daemon.write("/a", vec![1], FilePriority::SystemFast);
    daemon.write("/b", vec![2], FilePriority::SystemSlow);
    daemon.write("/c", vec![3], FilePriority::Game);

    daemon.stop().await.unwrap();

    assert_eq!(fs.read("/a").await.unwrap(), Some(vec![1]));
    assert_eq!(fs.read("/b").await.unwrap(), Some(vec![2]));
    assert_eq!(fs.read("/c").await.unwrap(), Some(vec![3]));
    assert!(daemon.files_waiting_to_write().is_empty());
    assert_eq!(daemon.status(), DaemonStatus::Stopped);
}

#[tokio::test(start_paused = true)]
async fn restart_after_stop_is_allowed() {
    let (daemon, _fs, _shutdown) = test_daemon();
    daemon.start().await.unwrap();
    daemon.stop().await.unwrap();

    daemon.start().await.unwrap();
    assert_eq!(daemon.status(), DaemonStatus::Running);
    daemon.stop().await.unwrap();
}
