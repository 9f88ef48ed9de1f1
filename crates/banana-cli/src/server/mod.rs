//! HTTP server startup and lifecycle management.

mod error;
mod http_server;

use axum::Router;
pub use error::{ServerError, ServerResult};
use http_server::serve_http;

use crate::config::ServerConfig;

/// Starts the HTTP server and runs it until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if:
/// - The server configuration is invalid
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve(app: Router, config: ServerConfig) -> ServerResult<()> {
    serve_http(app, config).await
}
