//! HTTP transport for the JSON-RPC handler.
//!
//! Terminates HTTP and hands request bodies to
//! [`RequestHandler::process_request`]; everything protocol-shaped lives on
//! the other side of that boundary.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::{config::CorsConfig, RequestHandler, RpcServerConfig};

/// Error type for RPC server operations.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind the listen address.
    #[error("failed to bind server: {0}")]
    Bind(std::io::Error),
}

/// Build a CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::new();
    }

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allowed_origins.len() == 1 && config.allowed_origins[0] == "*" {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> =
            config.allowed_origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// JSON-RPC server over HTTP.
pub struct RpcServer {
    handler: Arc<RequestHandler>,
    config: RpcServerConfig,
}

impl std::fmt::Debug for RpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcServer").field("addr", &self.config.addr).finish_non_exhaustive()
    }
}

impl RpcServer {
    /// Create a server for a handler, listening on `addr`.
    pub fn new(handler: RequestHandler, addr: SocketAddr) -> Self {
        Self { handler: Arc::new(handler), config: RpcServerConfig::new(addr) }
    }

    /// Create a server from full configuration.
    pub fn from_config(handler: RequestHandler, config: RpcServerConfig) -> Self {
        Self { handler: Arc::new(handler), config }
    }

    /// Set CORS configuration.
    #[must_use]
    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.config.cors = cors;
        self
    }

    /// Set maximum concurrently served requests.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.config.max_connections = max_connections;
        self
    }

    /// Bind the listen address and start serving.
    ///
    /// Returns once the listener is bound; serving continues on a spawned
    /// task owned by the returned handle.
    pub async fn start(self) -> Result<RpcServerHandle, ServerError> {
        let cors_layer = build_cors_layer(&self.config.cors);
        let app = Router::new()
            .route("/", post(rpc_handler))
            .route("/health", get(health_handler))
            .layer(cors_layer)
            .layer(ConcurrencyLimitLayer::new(self.config.max_connections as usize))
            .with_state(self.handler);

        let listener =
            tokio::net::TcpListener::bind(self.config.addr).await.map_err(ServerError::Bind)?;
        let addr = listener.local_addr().map_err(ServerError::Bind)?;

        info!(addr = %addr, "Starting JSON-RPC server");

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "JSON-RPC server error");
            }
        });

        Ok(RpcServerHandle { addr, task })
    }
}

/// Handle for managing the RPC server lifecycle.
pub struct RpcServerHandle {
    addr: SocketAddr,
    task: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for RpcServerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcServerHandle").field("addr", &self.addr).finish_non_exhaustive()
    }
}

impl RpcServerHandle {
    /// The bound listen address.
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server task to complete.
    pub async fn stopped(self) {
        let _ = self.task.await;
    }

    /// Abort the server task.
    pub fn abort(self) {
        self.task.abort();
    }
}

async fn rpc_handler(
    State(handler): State<Arc<RequestHandler>>,
    body: String,
) -> impl IntoResponse {
    let response = handler.process_request(&body);
    (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], response)
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_layer_empty_origins() {
        let config = CorsConfig::none();
        let _layer = build_cors_layer(&config);
    }

    #[test]
    fn cors_layer_wildcard() {
        let config = CorsConfig::permissive();
        let _layer = build_cors_layer(&config);
    }

    #[test]
    fn cors_layer_specific_origins() {
        let config = CorsConfig { allowed_origins: vec!["http://localhost:3000".to_string()] };
        let _layer = build_cors_layer(&config);
    }
}
