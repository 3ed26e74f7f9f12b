//! HTTP-echo server setup.
//!
//! # Responsibilities
//! - Build the catch-all Axum router
//! - Wire up middleware (tracing, request ID, metrics, body limit, timeout)
//! - Serve on a bound listener until shutdown

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
    routing::any,
    Router,
};
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::HttpServerConfig;
use crate::http::handler::echo;
use crate::net::{Listener, ListenerError};
use crate::observability::metrics;
use crate::transcript::Transcript;

/// Request ID header.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub transcript: Transcript,
}

/// HTTP server that prints every request and acknowledges it.
pub struct HttpEchoServer {
    router: Router,
    config: HttpServerConfig,
}

impl HttpEchoServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: HttpServerConfig, transcript: Transcript) -> Self {
        let state = AppState { transcript };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &HttpServerConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/", any(echo))
            .route("/{*path}", any(echo))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(middleware::from_fn(track_metrics))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<Listener, ListenerError> {
        Listener::bind(&self.config.bind_address).await
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: Listener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP echo server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener.into_inner(), app)
            .with_graceful_shutdown(crate::lifecycle::shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP echo server stopped");
        Ok(())
    }
}

/// Count every response, including ones produced by the limit and timeout
/// layers, and time the whole exchange from before the body is read.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let response = next.run(request).await;
    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}
