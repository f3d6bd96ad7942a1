// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The authenticated-proxy contract, one operation per backend resource.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::WebsageError;
use crate::types::ProxyResponse;

/// Forwards client requests to the analysis backend.
///
/// `Ok` means the backend was reached: the response carries its status and
/// body untouched, including 4xx and 5xx. `Err` is reserved for gateway-level
/// failures (`ServerMisconfigured`, `UpstreamUnreachable`).
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// `POST /analyze` with the body forwarded verbatim.
    async fn forward_analyze(&self, body: Bytes) -> Result<ProxyResponse, WebsageError>;

    /// `GET /analyze/sessions`. Degrades to `200 []` without a shared secret.
    async fn forward_list_sessions(&self) -> Result<ProxyResponse, WebsageError>;

    /// `GET /analyze/sessions/{id}`.
    async fn forward_get_session_detail(&self, id: &str) -> Result<ProxyResponse, WebsageError>;

    /// `POST /converse` with the body forwarded verbatim.
    async fn forward_converse(&self, body: Bytes) -> Result<ProxyResponse, WebsageError>;

    /// `GET /converse/history/{session_id}`.
    async fn forward_get_history(&self, session_id: &str)
    -> Result<ProxyResponse, WebsageError>;

    /// Whether the shared secret is configured.
    fn is_configured(&self) -> bool;
}
