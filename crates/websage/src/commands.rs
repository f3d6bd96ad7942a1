// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot commands: `sessions`, `analyze`, and `view`.
//!
//! Each prints pretty JSON to the given writer. A non-2xx backend answer is
//! returned as an error so the process exits non-zero.

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use websage_core::{AnalysisBackend, AnalyzeRequest, ProxyResponse, WebsageError};
use websage_session::SessionAggregator;

fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<(), WebsageError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| WebsageError::Internal(format!("failed to encode output: {e}")))?;
    writeln!(out, "{text}")
        .map_err(|e| WebsageError::Internal(format!("failed to write output: {e}")))
}

/// Prints a successful upstream body; fails with the upstream error otherwise.
fn write_upstream(out: &mut impl Write, resp: ProxyResponse) -> Result<(), WebsageError> {
    let resp = resp.into_success()?;
    let value: serde_json::Value = serde_json::from_slice(&resp.body).map_err(|e| {
        WebsageError::MalformedResponse {
            resource: "backend".to_string(),
            message: e.to_string(),
        }
    })?;
    write_json(out, &value)
}

/// `websage sessions`
pub async fn run_sessions(
    backend: &dyn AnalysisBackend,
    out: &mut impl Write,
) -> Result<(), WebsageError> {
    let resp = backend.forward_list_sessions().await?;
    debug!(status = resp.status, "session list received");
    write_upstream(out, resp)
}

/// `websage analyze <url> [-q <question>]...`
pub async fn run_analyze(
    backend: &dyn AnalysisBackend,
    url: String,
    questions: Vec<String>,
    out: &mut impl Write,
) -> Result<(), WebsageError> {
    let request = AnalyzeRequest {
        url,
        questions: (!questions.is_empty()).then_some(questions),
    };
    let body = serde_json::to_vec(&request)
        .map_err(|e| WebsageError::Internal(format!("failed to encode analyze request: {e}")))?;
    let resp = backend.forward_analyze(body.into()).await?;
    debug!(status = resp.status, "analysis received");
    write_upstream(out, resp)
}

/// `websage view <id>`
pub async fn run_view(
    backend: Arc<dyn AnalysisBackend>,
    id: &str,
    out: &mut impl Write,
) -> Result<(), WebsageError> {
    let view = SessionAggregator::new(backend).load_session_view(id).await?;
    write_json(out, &view.to_view_model())
}
