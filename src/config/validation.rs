//! Configuration validation.
//!
//! Serde handles syntax; this module checks values: addresses must parse,
//! limits and timeouts must be non-zero, the log level must be known.
//! All problems are reported together, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::EchoConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &EchoConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "message.bind_address", &config.message.bind_address);
    check_address(&mut errors, "http.bind_address", &config.http.bind_address);

    if config.message.drain_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "message.drain_timeout_secs" });
    }
    if config.http.max_body_bytes == 0 {
        errors.push(ValidationError::Zero { field: "http.max_body_bytes" });
    }
    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "http.request_timeout_secs" });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
