//! Startup orchestration shared by both binaries.
//!
//! Order: parse CLI → load config → apply overrides → validate →
//! init logging → init metrics. Any error here is fatal.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::validation::validate_config;
use crate::config::{load_config, ConfigError, EchoConfig};
use crate::observability::{logging, metrics};

/// Command-line options accepted by both servers.
#[derive(Debug, Clone, Default, Parser)]
pub struct Cli {
    /// TOML configuration file. Every setting has a default.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the bind address (`host:port`).
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Override the log level.
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Which server a binary runs; decides where `--bind` applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Message,
    Http,
}

/// Resolve the effective configuration from CLI options.
pub fn resolve_config(cli: &Cli, role: Role) -> Result<EchoConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EchoConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        match role {
            Role::Message => config.message.bind_address = bind.clone(),
            Role::Http => config.http.bind_address = bind.clone(),
        }
    }
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration and bring up logging and metrics.
pub fn prepare(cli: &Cli, role: Role) -> Result<EchoConfig, ConfigError> {
    let config = resolve_config(cli, role)?;

    logging::init_logging(&config.observability.log_level);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        role = ?role,
        "Configuration loaded"
    );

    Ok(config)
}
