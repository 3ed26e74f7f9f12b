//! The printed record of what the echo servers observed.
//!
//! Each [`Entry`] is printed with one `println!`. Message text is printed
//! verbatim, so a message containing newlines spans several lines. Tests can
//! tap the transcript through a channel instead of scraping the process
//! output.

use std::fmt;

use serde_json::Value;
use tokio::sync::mpsc;

/// One observable event.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// The message server is listening.
    Initialized,
    /// A text message, printed verbatim.
    Text(String),
    /// A binary message, printed as an escaped byte string.
    Binary(Vec<u8>),
    /// The peer completed a normal closing handshake.
    Closed,
    /// The peer went away without a normal close.
    ClosedForcibly,
    /// The connection failed for any other reason.
    Failed(String),
    /// An HTTP request was echoed. `path` has no leading slash.
    Request {
        method: String,
        path: String,
        body: Value,
    },
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Initialized => f.write_str("Initialized."),
            Entry::Text(text) => f.write_str(text),
            Entry::Binary(bytes) => write!(f, "b\"{}\"", bytes.escape_ascii()),
            Entry::Closed => f.write_str("Connection closed"),
            Entry::ClosedForcibly => f.write_str("Connection closed forcibly"),
            Entry::Failed(error) => f.write_str(error),
            Entry::Request { method, path, body } => write!(f, "{method} {path} {body}"),
        }
    }
}

/// Destination for transcript entries.
///
/// Cheap to clone; every connection task holds its own copy.
#[derive(Debug, Clone)]
pub struct Transcript {
    print: bool,
    tap: Option<mpsc::UnboundedSender<Entry>>,
}

impl Transcript {
    /// Print entries to stdout.
    pub fn stdout() -> Self {
        Self { print: true, tap: None }
    }

    /// Send entries to the returned receiver instead of stdout.
    pub fn tapped() -> (Self, mpsc::UnboundedReceiver<Entry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { print: false, tap: Some(tx) }, rx)
    }

    /// Record one entry.
    pub fn record(&self, entry: Entry) {
        if self.print {
            println!("{entry}");
        }
        if let Some(tap) = &self.tap {
            // Receiver gone means nobody is listening any more.
            let _ = tap.send(entry);
        }
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::stdout()
    }
}
