// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use websage_core::{AnalysisBackend, WebsageError};
use websage_session::SessionAggregator;

use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Pass-through to the analysis backend.
    pub backend: Arc<dyn AnalysisBackend>,
    /// Session view fan-out over the same backend.
    pub aggregator: SessionAggregator,
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            aggregator: SessionAggregator::new(Arc::clone(&backend)),
            backend,
            health: HealthState {
                start_time: std::time::Instant::now(),
            },
        }
    }
}

/// Gateway server configuration (mirrors `[server]` from websage-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the gateway router.
///
/// Routes:
/// - POST /analyze
/// - GET /analyze/sessions
/// - GET /analyze/sessions/{id}
/// - POST /converse
/// - GET /converse/history/{session_id}
/// - GET /sessions/{id}/view
/// - GET /health
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/analyze", post(handlers::post_analyze))
        .route("/analyze/sessions", get(handlers::get_sessions))
        .route("/analyze/sessions/{id}", get(handlers::get_session_detail))
        .route("/converse", post(handlers::post_converse))
        .route(
            "/converse/history/{session_id}",
            get(handlers::get_history),
        )
        .route("/sessions/{id}/view", get(handlers::get_session_view))
        .route("/health", get(handlers::get_health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and serve until `shutdown` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), WebsageError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WebsageError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| WebsageError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
