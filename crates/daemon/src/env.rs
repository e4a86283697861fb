// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the `wyrmholdd` binary.
//! The [`Config`](crate::Config) table itself is loaded from TOML; these
//! are the binary-level knobs that sit above it (where that file lives,
//! where to log, what to listen on).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_CONFIG_PATH: &str = "wyrmhold.toml";
const DEFAULT_LOG_PATH: &str = "wyrmhold.log";
const DEFAULT_BIND_PORT: u16 = 4242;

pub fn config_path() -> PathBuf {
    std::env::var("WYRMHOLD_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn log_path() -> PathBuf {
    std::env::var("WYRMHOLD_LOG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_PATH))
}

pub fn bind_addr() -> SocketAddr {
    std::env::var("WYRMHOLD_BIND_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_BIND_PORT))
}
