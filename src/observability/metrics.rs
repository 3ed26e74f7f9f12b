//! Metrics collection and exposition.
//!
//! # Metrics
//! - `echo_ws_connections_total` (counter): accepted message connections
//! - `echo_ws_messages_total` (counter): messages received, by `kind`
//! - `echo_ws_closures_total` (counter): connection endings, by `outcome`
//! - `echo_http_requests_total` (counter): requests, by `method` and `status`
//! - `echo_http_request_duration_seconds` (histogram): handling latency
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_connection() {
    counter!("echo_ws_connections_total").increment(1);
}

pub fn record_message(kind: &'static str) {
    counter!("echo_ws_messages_total", "kind" => kind).increment(1);
}

pub fn record_closure(outcome: &'static str) {
    counter!("echo_ws_closures_total", "outcome" => outcome).increment(1);
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "echo_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("echo_http_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
