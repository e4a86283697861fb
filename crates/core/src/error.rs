// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon's error taxonomy.
//!
//! No error type escapes the daemon's public API: failures degrade to
//! null results, silent refusals, or a transition to `DaemonStatus::Error`.
//! `DaemonError` exists so the internal plumbing (storage, heartbeat) and
//! the logger can agree on *kind* without parsing display strings.

use thiserror::Error;

/// Which of the five taxonomy members an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Filesystem read encountered a missing path. Never propagated as an
    /// error to callers — surfaced as `None` — but still classified here
    /// for logging symmetry with the other kinds.
    NotFound,
    /// Filesystem write failed. Never fatal; the path stays dirty for retry.
    TransientIoFailure,
    /// Shutdown observed during a suspending operation.
    Cancelled,
    /// Programmer error: uninitialized tier, out-of-range priority, etc.
    InvariantViolation,
    /// A heartbeat callback raised/panicked.
    CallbackFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::TransientIoFailure => "transient_io_failure",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::InvariantViolation => "invariant_violation",
            ErrorKind::CallbackFailure => "callback_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error produced by the daemon's internal plumbing.
///
/// Not part of the public `read`/`write` API surface (those return
/// `Option`/`()`), but used internally and by diagnostics to classify what
/// went wrong.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("io error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("shutdown observed during suspending operation")]
    Cancelled,
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("heartbeat callback failed: {0}")]
    CallbackFailure(String),
}

impl DaemonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DaemonError::Io { .. } => ErrorKind::TransientIoFailure,
            DaemonError::Cancelled => ErrorKind::Cancelled,
            DaemonError::InvariantViolation(_) => ErrorKind::InvariantViolation,
            DaemonError::CallbackFailure(_) => ErrorKind::CallbackFailure,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
