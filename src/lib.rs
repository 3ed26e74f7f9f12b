//! Echo test servers.
//!
//! Two stand-ins for test harnesses:
//!
//! - [`MessageEchoServer`]: accepts WebSocket connections and prints every
//!   message it receives, plus how each connection ended.
//! - [`HttpEchoServer`]: accepts any HTTP request, prints its method, path
//!   and JSON body, and answers `200 True`.
//!
//! Printed output goes through [`Transcript`]; diagnostics go through
//! `tracing`.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod message;
pub mod net;
pub mod observability;
pub mod transcript;

pub use config::EchoConfig;
pub use http::HttpEchoServer;
pub use lifecycle::Shutdown;
pub use message::MessageEchoServer;
pub use transcript::{Entry, Transcript};
