// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem seam: the core's one external collaborator for durable I/O.
//!
//! All paths are opaque strings — no parsing or normalization here.
//! `RealFilesystem` is the production implementation; `FakeFilesystem`
//! (behind `test-support`) is an in-memory, fault-injectable stand-in used
//! by every flush/cache test, the same testable-I/O split the codebase
//! already uses for its checkpoint writer.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("io error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("injected failure for {0}")]
    Injected(String),
}

/// Whole-file read/write, with a distinguished "not found" result for reads
/// that does not raise.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// `Ok(None)` means the path does not exist; that is not an error.
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, FsError>;

    /// Whole-file replace. Implementations should make this atomic with
    /// respect to readers observing a partially-written file.
    async fn write(&self, path: &str, content: &[u8]) -> Result<(), FsError>;
}

/// Production filesystem. Writes via a temp-file-then-rename so a reader
/// never observes a partially-written file — the same pattern the
/// codebase's checkpoint writer uses for its snapshot file.
#[derive(Debug, Clone, Default)]
pub struct RealFilesystem;

#[async_trait]
impl Filesystem for RealFilesystem {
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, FsError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FsError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }

    async fn write(&self, path: &str, content: &[u8]) -> Result<(), FsError> {
        let target = Path::new(path);
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| FsError::Io {
                        path: path.to_string(),
                        source,
                    })?;
            }
        }

        let tmp_path: PathBuf = {
            let mut p = target.as_os_str().to_owned();
            p.push(".tmp");
            PathBuf::from(p)
        };

        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|source| FsError::Io {
                path: path.to_string(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, target)
            .await
            .map_err(|source| FsError::Io {
                path: path.to_string(),
                source,
            })?;
        Ok(())
    }
}

/// In-memory filesystem for tests. Supports injecting a one-shot write
/// failure to exercise the flush queue's retry-on-failure path.
#[cfg(any(test, feature = "test-support"))]
#[derive(Default)]
pub struct FakeFilesystem {
    files: parking_lot::Mutex<HashMap<String, Vec<u8>>>,
    fail_next_write: parking_lot::Mutex<Option<String>>,
    write_log: parking_lot::Mutex<Vec<String>>,
    read_log: parking_lot::Mutex<Vec<String>>,
    #[allow(clippy::type_complexity)]
    before_write: parking_lot::Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, path: impl Into<String>, content: Vec<u8>) {
        self.files.lock().insert(path.into(), content);
    }

    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().get(path).cloned()
    }

    /// The next `write()` to `path` fails once, then subsequent writes succeed.
    pub fn fail_next_write_to(&self, path: impl Into<String>) {
        *self.fail_next_write.lock() = Some(path.into());
    }

    /// Paths written to, in call order (duplicates included).
    pub fn write_log(&self) -> Vec<String> {
        self.write_log.lock().clone()
    }

    /// Paths read, in call order (duplicates included) — lets tests assert
    /// a cache hit never reaches the filesystem collaborator.
    pub fn read_log(&self) -> Vec<String> {
        self.read_log.lock().clone()
    }

    /// Run `hook` once, synchronously, after this write captures its
    /// content but before it durably lands — lets tests simulate a
    /// concurrent mutation landing while a flush write is "in flight".
    pub fn run_before_next_write(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.before_write.lock() = Some(Box::new(hook));
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl Filesystem for FakeFilesystem {
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, FsError> {
        self.read_log.lock().push(path.to_string());
        Ok(self.files.lock().get(path).cloned())
    }

    async fn write(&self, path: &str, content: &[u8]) -> Result<(), FsError> {
        if let Some(hook) = self.before_write.lock().take() {
            hook();
        }
        {
            let mut fail_next = self.fail_next_write.lock();
            if fail_next.as_deref() == Some(path) {
                *fail_next = None;
                return Err(FsError::Injected(path.to_string()));
            }
        }
        self.write_log.lock().push(path.to_string());
        self.files.lock().insert(path.to_string(), content.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[path = "filesystem_tests.rs"]
mod tests;
