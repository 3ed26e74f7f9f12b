//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use echo_servers::config::{HttpServerConfig, MessageServerConfig};
use echo_servers::{Entry, HttpEchoServer, MessageEchoServer, Shutdown, Transcript};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A server running on an ephemeral port with its transcript tapped.
pub struct Running {
    pub addr: SocketAddr,
    pub entries: mpsc::UnboundedReceiver<Entry>,
    pub shutdown: Shutdown,
    pub task: JoinHandle<()>,
}

impl Running {
    /// Next transcript entry, failing the test after a second of silence.
    pub async fn next_entry(&mut self) -> Entry {
        tokio::time::timeout(Duration::from_secs(1), self.entries.recv())
            .await
            .expect("timed out waiting for transcript entry")
            .expect("transcript closed")
    }

    /// Assert nothing else was recorded within a short window.
    pub async fn assert_quiet(&mut self) {
        let extra = tokio::time::timeout(Duration::from_millis(100), self.entries.recv()).await;
        assert!(extra.is_err(), "unexpected entry: {extra:?}");
    }

    /// Trigger shutdown and wait for the run loop to return.
    pub async fn stop(self) {
        assert!(self.shutdown.trigger() >= 1, "server was not listening for shutdown");
        tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("server did not stop")
            .expect("server task panicked");
    }
}

/// Start a message-echo server on 127.0.0.1 with an ephemeral port.
pub async fn start_message_server() -> Running {
    let config = MessageServerConfig {
        bind_address: "127.0.0.1:0".into(),
        drain_timeout_secs: 2,
    };
    let (transcript, mut entries) = Transcript::tapped();
    let server = MessageEchoServer::bind(&config, transcript).await.unwrap();
    let addr = server.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let task = tokio::spawn(async move {
        server.run(server_shutdown).await.unwrap();
    });

    assert_eq!(entries.recv().await, Some(Entry::Initialized));

    Running {
        addr,
        entries,
        shutdown,
        task,
    }
}

/// Start an HTTP-echo server on 127.0.0.1 with an ephemeral port.
pub async fn start_http_server() -> Running {
    let config = HttpServerConfig {
        bind_address: "127.0.0.1:0".into(),
        ..HttpServerConfig::default()
    };
    let (transcript, entries) = Transcript::tapped();
    let server = HttpEchoServer::new(config, transcript);
    let listener = server.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let task = tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });

    Running {
        addr,
        entries,
        shutdown,
        task,
    }
}

/// HTTP client that never reuses connections or consults proxy settings.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
