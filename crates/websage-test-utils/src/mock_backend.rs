// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted analysis backend for deterministic testing.
//!
//! `MockBackend` implements `AnalysisBackend` with per-resource FIFO queues of
//! outcomes. When a queue is empty it answers `200` with the resource's empty
//! body, mirroring what the real proxy substitutes for a non-JSON reply.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{Mutex, Notify};

use websage_core::{AnalysisBackend, ProxyResponse, Resource, WebsageError};

type Outcome = Result<ProxyResponse, WebsageError>;

/// A call observed by [`MockBackend`], with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Analyze(Bytes),
    ListSessions,
    SessionDetail(String),
    Converse(Bytes),
    History(String),
}

impl RecordedCall {
    pub fn resource(&self) -> Resource {
        match self {
            RecordedCall::Analyze(_) => Resource::Analyze,
            RecordedCall::ListSessions => Resource::SessionList,
            RecordedCall::SessionDetail(_) => Resource::SessionDetail,
            RecordedCall::Converse(_) => Resource::Converse,
            RecordedCall::History(_) => Resource::History,
        }
    }
}

/// A mock backend that replays scripted outcomes and records every call.
pub struct MockBackend {
    configured: bool,
    outcomes: Mutex<HashMap<Resource, VecDeque<Outcome>>>,
    calls: Mutex<Vec<RecordedCall>>,
    converse_gate: Option<Arc<Notify>>,
}

impl MockBackend {
    /// A configured backend with no scripted outcomes.
    pub fn new() -> Self {
        Self {
            configured: true,
            outcomes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            converse_gate: None,
        }
    }

    /// Behaves like a proxy without a shared secret: the session list is
    /// `200 []` and every other call fails with `ServerMisconfigured`.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Queue a response for `resource`.
    pub fn with_response(mut self, resource: Resource, response: ProxyResponse) -> Self {
        self.queue_mut(resource).push_back(Ok(response));
        self
    }

    /// Queue an error for `resource`.
    pub fn with_error(mut self, resource: Resource, error: WebsageError) -> Self {
        self.queue_mut(resource).push_back(Err(error));
        self
    }

    /// Hold every converse call until the returned handle is notified.
    pub fn with_converse_gate(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.converse_gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Queue a response after construction.
    pub async fn push_response(&self, resource: Resource, response: ProxyResponse) {
        self.outcomes
            .lock()
            .await
            .entry(resource)
            .or_default()
            .push_back(Ok(response));
    }

    /// Every call so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Number of calls made against `resource`.
    pub async fn call_count(&self, resource: Resource) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.resource() == resource)
            .count()
    }

    fn queue_mut(&mut self, resource: Resource) -> &mut VecDeque<Outcome> {
        self.outcomes.get_mut().entry(resource).or_default()
    }

    async fn respond(&self, call: RecordedCall) -> Outcome {
        let resource = call.resource();
        self.calls.lock().await.push(call);

        if !self.configured {
            return match resource {
                Resource::SessionList => Ok(ProxyResponse::empty_list()),
                _ => Err(WebsageError::ServerMisconfigured),
            };
        }

        self.outcomes
            .lock()
            .await
            .get_mut(&resource)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(ProxyResponse::new(200, resource.fallback_body())))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn forward_analyze(&self, body: Bytes) -> Result<ProxyResponse, WebsageError> {
        self.respond(RecordedCall::Analyze(body)).await
    }

    async fn forward_list_sessions(&self) -> Result<ProxyResponse, WebsageError> {
        self.respond(RecordedCall::ListSessions).await
    }

    async fn forward_get_session_detail(&self, id: &str) -> Result<ProxyResponse, WebsageError> {
        self.respond(RecordedCall::SessionDetail(id.to_string()))
            .await
    }

    async fn forward_converse(&self, body: Bytes) -> Result<ProxyResponse, WebsageError> {
        if let Some(gate) = &self.converse_gate {
            gate.notified().await;
        }
        self.respond(RecordedCall::Converse(body)).await
    }

    async fn forward_get_history(
        &self,
        session_id: &str,
    ) -> Result<ProxyResponse, WebsageError> {
        self.respond(RecordedCall::History(session_id.to_string()))
            .await
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
