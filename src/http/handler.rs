//! Catch-all echo handler.
//!
//! Any method, any path: parse the body as JSON, record
//! `<METHOD> <path> <body>`, answer `200 True`. The path is printed as it
//! arrived on the wire, still percent-encoded, so no path can be rejected.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::http::server::AppState;
use crate::transcript::Entry;

/// Fixed acknowledgment body.
pub const ACK: &str = "True";

/// Parse a request body. An empty body is `null`.
pub fn parse_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

/// Path as printed: the request path without its leading slash.
pub fn echo_path(uri: &Uri) -> &str {
    let path = uri.path();
    path.strip_prefix('/').unwrap_or(path)
}

/// Handler for `/` and `/{*path}`.
pub async fn echo(State(state): State<AppState>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = echo_path(&uri);

    match parse_body(&body) {
        Ok(body) => {
            state.transcript.record(Entry::Request {
                method: method.to_string(),
                path: path.to_string(),
                body,
            });
            (StatusCode::OK, ACK).into_response()
        }
        Err(e) => {
            tracing::warn!(method = %method, path = %path, error = %e, "Rejected malformed body");
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to parse the request body as JSON: {e}"),
            )
                .into_response()
        }
    }
}
