// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wyrmholdd: boots the File Daemon, a bare echo acceptor standing in for
//! the rest of the driver, and wires both to one shared shutdown signal.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;

use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use wyrmhold_adapters::EchoAcceptor;
use wyrmhold_core::{ShutdownSignal, SystemClock};
use wyrmhold_daemon::{Config, FileDaemon};
use wyrmhold_storage::RealFilesystem;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("wyrmholdd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("wyrmholdd {}", env!("CARGO_PKG_VERSION"));
                println!("Wyrmhold file daemon: prioritized write-back file cache.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: wyrmholdd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let log_path = env::log_path();
    rotate_log_if_needed(&log_path);
    let _log_guard = setup_logging(&log_path)?;

    let config = Config::load(&env::config_path())?;
    info!("starting wyrmhold file daemon");

    let shutdown = ShutdownSignal::new();
    let fs = Arc::new(RealFilesystem);
    let clock = Arc::new(SystemClock);
    let daemon = FileDaemon::new(config, fs, clock, shutdown.clone());
    daemon.start().await?;

    let bind_addr = env::bind_addr();
    match EchoAcceptor::bind(bind_addr).await {
        Ok(acceptor) => {
            tokio::spawn(acceptor.serve(shutdown.clone()));
            info!(%bind_addr, "echo acceptor listening");
        }
        Err(e) => {
            // Scaffolding collaborator; its failure to bind must not take
            // the file daemon down with it.
            error!(%bind_addr, error = %e, "echo acceptor failed to bind");
        }
    }

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    shutdown.request();
    // The daemon's own shutdown-signal watcher drives the drain; give it a
    // moment to finish before the process exits.
    while daemon.status() != wyrmhold_daemon::DaemonStatus::Stopped {
        tokio::task::yield_now().await;
    }

    info!("wyrmhold file daemon stopped");
    Ok(())
}

/// Maximum log file size before rotation (10 MB).
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rotated log files to keep (wyrmhold.log.1, .2, .3).
const MAX_ROTATED_LOGS: u32 = 3;

/// Rotate the daemon log file if it exceeds [`MAX_LOG_SIZE`]. Best-effort:
/// rotation failures are silently ignored so the daemon still starts.
fn rotate_log_if_needed(log_path: &std::path::Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };

    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();

    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }

    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

fn setup_logging(
    log_path: &std::path::Path,
) -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let dir = log_path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        std::fs::create_dir_all(dir)?;
    }

    let file_name = log_path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "log path has no file name")
    })?;
    let file_appender = tracing_appender::rolling::never(dir.unwrap_or_else(|| std::path::Path::new(".")), file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
