//! Message-echo subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept, WebSocket handshake, one task per connection)
//!     → handler.rs (read loop, close classification)
//!     → transcript (one line per message or ending)
//! ```
//!
//! A failing connection never affects the accept loop or other connections.

pub mod handler;
pub mod server;

pub use handler::Outcome;
pub use server::MessageEchoServer;
