// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! The five backend routes forward bodies untouched and answer with the
//! upstream status and body. Only gateway-level failures produce a body of
//! the gateway's own making.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;

use websage_core::{ProxyResponse, WebsageError};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    pub uptime_secs: u64,
    /// Whether a shared secret is configured for the backend.
    pub backend_configured: bool,
}

/// Relays a proxy outcome to the client.
fn relay(outcome: Result<ProxyResponse, WebsageError>) -> Response {
    match outcome {
        Ok(resp) => {
            let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, [(header::CONTENT_TYPE, "application/json")], resp.body).into_response()
        }
        Err(e) => ApiError(e).into_response(),
    }
}

/// POST /analyze
pub async fn post_analyze(State(state): State<GatewayState>, body: Bytes) -> Response {
    relay(state.backend.forward_analyze(body).await)
}

/// GET /analyze/sessions
///
/// Answers `200 []` when no shared secret is configured.
pub async fn get_sessions(State(state): State<GatewayState>) -> Response {
    relay(state.backend.forward_list_sessions().await)
}

/// GET /analyze/sessions/{id}
pub async fn get_session_detail(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Response {
    relay(state.backend.forward_get_session_detail(&id).await)
}

/// POST /converse
pub async fn post_converse(State(state): State<GatewayState>, body: Bytes) -> Response {
    relay(state.backend.forward_converse(body).await)
}

/// GET /converse/history/{session_id}
pub async fn get_history(
    State(state): State<GatewayState>,
    Path(session_id): Path<String>,
) -> Response {
    relay(state.backend.forward_get_history(&session_id).await)
}

/// GET /sessions/{id}/view
///
/// Runs the session fan-out and returns the merged view model.
pub async fn get_session_view(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let view = state.aggregator.load_session_view(&id).await?;
    Ok(Json(view.to_view_model()).into_response())
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        backend_configured: state.backend.is_configured(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
            backend_configured: false,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
        assert!(json.contains("\"backend_configured\":false"));
    }

    #[test]
    fn relay_keeps_upstream_status_and_body() {
        let resp = relay(Ok(ProxyResponse::new(418, r#"{"detail":"teapot"}"#)));
        assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }

    #[test]
    fn relay_maps_gateway_errors() {
        let resp = relay(Err(WebsageError::ServerMisconfigured));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
