//! RPC server configuration.

use std::net::SocketAddr;

/// Configuration for the RPC server.
#[derive(Clone, Debug)]
pub struct RpcServerConfig {
    /// Address the JSON-RPC server listens on.
    pub addr: SocketAddr,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Maximum number of concurrently served requests.
    pub max_connections: u32,
}

impl RpcServerConfig {
    /// Create a configuration with default CORS and connection limits.
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr, cors: CorsConfig::default(), max_connections: 100 }
    }

    /// Set CORS allowed origins.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors.allowed_origins = origins;
        self
    }

    /// Set maximum concurrent requests.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self::new(
            // Loopback default; the binary overrides with its CLI arguments.
            SocketAddr::from(([127, 0, 0, 1], 8080)),
        )
    }
}

/// CORS configuration for the RPC server.
#[derive(Clone, Debug, Default)]
pub struct CorsConfig {
    /// Allowed origins. Empty means no CORS headers are sent.
    /// Use `["*"]` to allow all origins.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Allow no origins.
    pub const fn none() -> Self {
        Self { allowed_origins: Vec::new() }
    }

    /// Allow every origin. Development only.
    pub fn permissive() -> Self {
        Self { allowed_origins: vec!["*".to_string()] }
    }
}
