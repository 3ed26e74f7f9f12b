//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → EchoConfig (validated, immutable)
//!     → CLI overrides applied in lifecycle::startup
//! ```
//!
//! All fields have defaults; the servers need no file to run.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{EchoConfig, HttpServerConfig, MessageServerConfig, ObservabilityConfig};
