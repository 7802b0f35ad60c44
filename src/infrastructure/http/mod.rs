//! Liveness probe endpoint
//!
//! Some hosting environments expect the process to bind a port and answer
//! health checks. When a port is configured, any GET gets a 200 "ok".

use axum::routing::get;
use axum::Router;

use crate::application::errors::BotError;

pub async fn serve(port: u16) -> Result<(), BotError> {
    let app = Router::new().fallback(get(|| async { "ok" }));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| BotError::Network(format!("failed to bind port {}: {}", port, e)))?;

    tracing::info!("Liveness endpoint listening on port {}", port);
    axum::serve(listener, app)
        .await
        .map_err(|e| BotError::Network(e.to_string()))
}
