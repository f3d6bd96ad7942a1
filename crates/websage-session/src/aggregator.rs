// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out and merge of the three session resources.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use websage_core::{
    AnalysisBackend, AnalysisDetail, ConversationHistoryEntry, ProxyResponse, Resource, Session,
    WebsageError,
};

use crate::history::expand_history;
use crate::view::{PartialData, SessionView};

/// Builds [`SessionView`]s from the backend.
#[derive(Clone)]
pub struct SessionAggregator {
    backend: Arc<dyn AnalysisBackend>,
}

impl SessionAggregator {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn AnalysisBackend> {
        &self.backend
    }

    /// Loads the view for `id`.
    ///
    /// Fails only with `SessionNotFound`, when the list cannot be read or has
    /// no entry for `id`. Detail and history failures degrade the view.
    pub async fn load_session_view(&self, id: &str) -> Result<SessionView, WebsageError> {
        self.load_session_view_until(id, &CancellationToken::new())
            .await
    }

    /// Like [`load_session_view`](Self::load_session_view), abandoning the
    /// fan-out with `Cancelled` once `cancel` fires.
    pub async fn load_session_view_until(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<SessionView, WebsageError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(session_id = id, "session view load cancelled");
                Err(WebsageError::Cancelled)
            }
            view = self.fetch(id) => view,
        }
    }

    async fn fetch(&self, id: &str) -> Result<SessionView, WebsageError> {
        let (list, detail, history) = tokio::join!(
            self.backend.forward_list_sessions(),
            self.backend.forward_get_session_detail(id),
            self.backend.forward_get_history(id),
        );

        let session = find_session(list, id)?;
        let mut view = SessionView::new(session);

        match shape::<AnalysisDetail>(detail, Resource::SessionDetail) {
            Ok(detail) => view.detail = Some(detail),
            Err(e) => {
                warn!(session_id = id, error = %e, "session detail unavailable, degrading");
                view.degraded.push(PartialData::Detail);
            }
        }

        match shape::<Vec<ConversationHistoryEntry>>(history, Resource::History) {
            Ok(entries) => view.conversation = expand_history(entries),
            Err(e) => {
                warn!(session_id = id, error = %e, "conversation history unavailable, degrading");
                view.degraded.push(PartialData::History);
            }
        }

        debug!(
            session_id = id,
            messages = view.conversation.len(),
            degraded = view.degraded.len(),
            "session view assembled"
        );
        Ok(view)
    }
}

impl std::fmt::Debug for SessionAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAggregator")
            .field("backend_configured", &self.backend.is_configured())
            .finish()
    }
}

fn shape<T: serde::de::DeserializeOwned>(
    outcome: Result<ProxyResponse, WebsageError>,
    resource: Resource,
) -> Result<T, WebsageError> {
    outcome?.parse(resource)
}

fn find_session(
    list: Result<ProxyResponse, WebsageError>,
    id: &str,
) -> Result<Session, WebsageError> {
    let not_found = || WebsageError::SessionNotFound { id: id.to_string() };
    let sessions = shape::<Vec<Session>>(list, Resource::SessionList).map_err(|e| {
        warn!(session_id = id, error = %e, "session list unavailable");
        not_found()
    })?;
    sessions
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(not_found)
}
