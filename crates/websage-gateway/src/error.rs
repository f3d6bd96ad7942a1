// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON error responses.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use websage_core::WebsageError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Configured backend host; present only when it could not be reached.
    #[serde(rename = "backendUrl", skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
}

/// A [`WebsageError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub WebsageError);

impl From<WebsageError> for ApiError {
    fn from(err: WebsageError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let backend_url = match &self.0 {
            WebsageError::UpstreamUnreachable { backend_url, .. } => Some(backend_url.clone()),
            _ => None,
        };

        match self.0 {
            // Reached the backend: its own body is the answer.
            WebsageError::UpstreamError { body, .. } => {
                (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
            other => {
                let body = ErrorResponse {
                    error: other.to_string(),
                    backend_url,
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
