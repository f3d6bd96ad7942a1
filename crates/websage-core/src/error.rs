// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the WebSage gateway.

use bytes::Bytes;
use thiserror::Error;

/// Fallback text shown when a failed upstream call carries no usable message.
pub const REQUEST_FAILED: &str = "Request failed";

/// The primary error type used across the proxy, aggregator, and gateway.
#[derive(Debug, Error)]
pub enum WebsageError {
    /// Configuration errors (invalid TOML, bad URL, unknown keys).
    #[error("configuration error: {0}")]
    Config(String),

    /// The shared secret is absent. Raised before any network access.
    #[error("Server misconfigured: missing API secret")]
    ServerMisconfigured,

    /// The analysis backend could not be reached (DNS, refused, reset, timeout).
    ///
    /// `backend_url` is the configured scheme and host only; it never carries
    /// credentials.
    #[error("analysis backend unreachable at {backend_url}: {message}")]
    UpstreamUnreachable {
        backend_url: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered with a non-2xx status.
    #[error("analysis backend returned status {status}")]
    UpstreamError { status: u16, body: Bytes },

    /// The backend answered 2xx but the body did not match the expected schema.
    #[error("malformed {resource} response: {message}")]
    MalformedResponse {
        resource: String,
        message: String,
    },

    /// No entry in the session list carries the requested id.
    #[error("Session not found")]
    SessionNotFound { id: String },

    /// The consumer tore down before the operation resolved.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WebsageError {
    /// HTTP status the gateway reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            WebsageError::ServerMisconfigured => 500,
            WebsageError::UpstreamUnreachable { .. } => 502,
            WebsageError::UpstreamError { status, .. } => *status,
            WebsageError::MalformedResponse { .. } => 502,
            WebsageError::SessionNotFound { .. } => 404,
            WebsageError::Config(_) | WebsageError::Cancelled | WebsageError::Internal(_) => 500,
        }
    }

    /// Human-readable text suitable for showing in a conversation.
    ///
    /// For upstream failures this prefers the backend's own `detail` or `error`
    /// string, falling back to [`REQUEST_FAILED`].
    pub fn user_message(&self) -> String {
        match self {
            WebsageError::UpstreamError { body, .. } => serde_json::from_slice::<serde_json::Value>(body)
                .ok()
                .and_then(|v| {
                    ["detail", "error"]
                        .iter()
                        .find_map(|k| v.get(k).and_then(|m| m.as_str()).map(str::to_string))
                })
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| REQUEST_FAILED.to_string()),
            other => other.to_string(),
        }
    }
}
