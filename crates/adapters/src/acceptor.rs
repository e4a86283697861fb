// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bare TCP acceptor that accepts connections but does little beyond echo.
//! Deliberately shallow — no line protocol, no session state, no
//! game-object wiring. Exists so the daemon binary has something to listen
//! on; its own behavior is explicitly out of scope.

use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};
use wyrmhold_core::ShutdownSignal;

/// Accepts connections on `addr` and echoes whatever each client sends,
/// until `shutdown` is requested.
pub struct EchoAcceptor {
    listener: TcpListener,
}

impl EchoAcceptor {
    pub async fn bind(addr: SocketAddr) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs until `shutdown` fires; each connection is handled on its own
    /// task and is not awaited for graceful close on shutdown (acceptable
    /// for a scaffolding echo server).
    pub async fn serve(self, shutdown: ShutdownSignal) {
        info!(addr = ?self.local_addr(), "echo acceptor listening");
        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!(%peer, "accepted connection");
                            tokio::spawn(echo(stream));
                        }
                        Err(e) => warn!(error = %e, "accept failed"),
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("echo acceptor shutting down");
                    break;
                }
            }
        }
    }
}

async fn echo(mut stream: TcpStream) {
    let mut buf = [0u8; 4096];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if stream.write_all(&buf[..n]).await.is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
}

#[cfg(test)]
#[path = "acceptor_tests.rs"]
mod tests;
