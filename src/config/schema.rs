//! Configuration schema definitions.
//!
//! Every section is defaulted so both servers run with no config file at all.
//! All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

/// Root configuration shared by both echo servers.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct EchoConfig {
    /// Message-echo (WebSocket) server settings.
    pub message: MessageServerConfig,

    /// HTTP-echo server settings.
    pub http: HttpServerConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Message-echo server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MessageServerConfig {
    /// Bind address (all interfaces by default).
    pub bind_address: String,

    /// How long shutdown waits for open connections to finish closing.
    pub drain_timeout_secs: u64,
}

impl Default for MessageServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:12345".to_string(),
            drain_timeout_secs: 5,
        }
    }
}

/// HTTP-echo server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HttpServerConfig {
    /// Bind address (loopback by default).
    pub bind_address: String,

    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:12345".to_string(),
            max_body_bytes: 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
