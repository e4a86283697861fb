// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use wyrmhold_core::ShutdownSignal;

#[tokio::test]
async fn echoes_bytes_sent_by_a_client() {
    let acceptor = EchoAcceptor::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = acceptor.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();
    let serving = tokio::spawn(acceptor.serve(shutdown.clone()));

    let mut client = TcpStream::connect(addr).await.unwrap();
    client.write_all(b"hello").await.unwrap();

    let mut buf = [0u8; 5];
    client.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"hello");

    shutdown.request();
    serving.await.unwrap();
}

#[tokio::test]
async fn stops_accepting_once_shutdown_is_requested() {
    let acceptor = EchoAcceptor::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let shutdown = ShutdownSignal::new();
    shutdown.request();

    let serving = tokio::spawn(acceptor.serve(shutdown));
    tokio::time::timeout(std::time::Duration::from_secs(1), serving)
        .await
        .expect("serve must return promptly once shutdown is already requested")
        .unwrap();
}
