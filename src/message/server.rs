//! Message-echo server: accept loop and connection lifecycle.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio_tungstenite::accept_async;

use crate::config::MessageServerConfig;
use crate::message::handler::handle_connection;
use crate::net::{ConnectionTracker, Listener, ListenerError};
use crate::observability::metrics;
use crate::transcript::{Entry, Transcript};

/// Pause after a failed accept so a persistent error does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// WebSocket server that prints every message it receives.
pub struct MessageEchoServer {
    listener: Listener,
    transcript: Transcript,
    tracker: ConnectionTracker,
    drain_timeout: Duration,
}

impl MessageEchoServer {
    /// Bind the listening socket. Fails if the address is unusable.
    pub async fn bind(
        config: &MessageServerConfig,
        transcript: Transcript,
    ) -> Result<Self, ListenerError> {
        let listener = Listener::bind(&config.bind_address).await?;
        Ok(Self {
            listener,
            transcript,
            tracker: ConnectionTracker::new(),
            drain_timeout: Duration::from_secs(config.drain_timeout_secs),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` fires, then drain.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), ListenerError> {
        let addr = self.listener.local_addr().map_err(ListenerError::Bind)?;
        tracing::info!(address = %addr, "Message echo server starting");
        self.transcript.record(Entry::Initialized);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_connection(stream, peer, shutdown.resubscribe()),
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
                _ = shutdown.recv() => break,
            }
        }

        // Stop accepting before waiting on open connections.
        drop(self.listener);

        let open = self.tracker.active_count();
        if open > 0 {
            tracing::info!(open_connections = open, "Draining connections");
            if tokio::time::timeout(self.drain_timeout, self.tracker.wait_for_drain())
                .await
                .is_err()
            {
                tracing::warn!(
                    open_connections = self.tracker.active_count(),
                    timeout_secs = self.drain_timeout.as_secs(),
                    "Drain timed out"
                );
            }
        }

        tracing::info!("Message echo server stopped");
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr, shutdown: broadcast::Receiver<()>) {
        let guard = self.tracker.track();
        let transcript = self.transcript.clone();
        metrics::record_connection();

        tokio::spawn(async move {
            let connection_id = guard.id();
            match accept_async(stream).await {
                Ok(ws) => {
                    tracing::info!(
                        connection_id = %connection_id,
                        peer_addr = %peer,
                        "WebSocket connection opened"
                    );
                    let outcome = handle_connection(ws, &transcript, shutdown).await;
                    tracing::info!(
                        connection_id = %connection_id,
                        peer_addr = %peer,
                        outcome = ?outcome,
                        "WebSocket connection ended"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        peer_addr = %peer,
                        error = %e,
                        "WebSocket handshake failed"
                    );
                    transcript.record(Entry::Failed(e.to_string()));
                }
            }
            drop(guard);
        });
    }
}
