//! Per-connection message loop.
//!
//! Reads one message at a time and records it, until the peer closes or the
//! connection fails. Every path out of the loop ends handling for this
//! connection only.

use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::error::{Error as WsError, ProtocolError};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::observability::metrics;
use crate::transcript::{Entry, Transcript};

/// How a connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Normal closing handshake (1000, 1001 or no status code).
    Closed,
    /// Reset without a handshake, or a close frame with an error code.
    ClosedForcibly,
    /// Malformed frame, protocol violation or transport failure.
    Failed(String),
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Outcome::Closed => "closed",
            Outcome::ClosedForcibly => "forced",
            Outcome::Failed(_) => "failed",
        }
    }
}

impl From<Outcome> for Entry {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Closed => Entry::Closed,
            Outcome::ClosedForcibly => Entry::ClosedForcibly,
            Outcome::Failed(error) => Entry::Failed(error),
        }
    }
}

/// Classify a close frame sent by the peer.
pub fn classify_close(frame: Option<&CloseFrame>) -> Outcome {
    match frame.map(|f| f.code) {
        None | Some(CloseCode::Normal) | Some(CloseCode::Away) | Some(CloseCode::Status) => {
            Outcome::Closed
        }
        Some(_) => Outcome::ClosedForcibly,
    }
}

/// Classify a read error.
pub fn classify_error(err: &WsError) -> Outcome {
    use std::io::ErrorKind;

    match err {
        WsError::ConnectionClosed | WsError::AlreadyClosed => Outcome::Closed,
        WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake) => Outcome::ClosedForcibly,
        WsError::Io(e)
            if matches!(
                e.kind(),
                ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
                    | ErrorKind::UnexpectedEof
            ) =>
        {
            Outcome::ClosedForcibly
        }
        other => Outcome::Failed(other.to_string()),
    }
}

/// Run the message loop for one upgraded connection.
///
/// When `shutdown` fires the server starts a Going Away close and keeps
/// reading until the peer answers or drops.
pub async fn handle_connection<S>(
    mut ws: WebSocketStream<S>,
    transcript: &Transcript,
    mut shutdown: broadcast::Receiver<()>,
) -> Outcome
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut closing = false;

    let outcome = loop {
        tokio::select! {
            next = ws.next() => match next {
                Some(Ok(Message::Text(text))) => {
                    metrics::record_message("text");
                    transcript.record(Entry::Text(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(bytes))) => {
                    metrics::record_message("binary");
                    transcript.record(Entry::Binary(bytes.to_vec()));
                }
                Some(Ok(Message::Close(frame))) => {
                    let outcome = classify_close(frame.as_ref());
                    // Flushes the queued close reply.
                    let _ = ws.close(None).await;
                    break outcome;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => break classify_error(&e),
                None => break Outcome::Closed,
            },
            _ = shutdown.recv(), if !closing => {
                closing = true;
                let frame = CloseFrame {
                    code: CloseCode::Away,
                    reason: "server shutting down".into(),
                };
                if let Err(e) = ws.close(Some(frame)).await {
                    break classify_error(&e);
                }
            }
        }
    };

    metrics::record_closure(outcome.label());
    transcript.record(outcome.clone().into());
    outcome
}
