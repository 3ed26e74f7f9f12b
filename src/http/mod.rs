//! HTTP-echo subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → handler.rs (parse JSON body, record, acknowledge)
//!     → "True"
//! ```

pub mod handler;
pub mod server;

pub use handler::ACK;
pub use server::{AppState, HttpEchoServer, X_REQUEST_ID};
