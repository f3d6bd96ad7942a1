// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Follow-up conversation FSM.
//!
//! States: Idle -> Submitting -> Idle. A submission is split into three steps
//! so callers can render the optimistic state while the request is in flight:
//!
//! 1. [`ConversationController::begin`] appends the user's message and moves to
//!    `Submitting`, before any network access.
//! 2. [`ConversationController::send`] forwards the question.
//! 3. [`ConversationController::finish`] appends the answer or the error text
//!    and returns to `Idle`.

use bytes::Bytes;
use chrono::Utc;
use strum::Display;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use websage_core::{
    AnalysisBackend, ConversationMessage, ConverseRequest, ConverseResult, Resource, Role,
    WebsageError,
};

use crate::view::{DirectResult, SessionView};

/// States in the conversation FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConversationState {
    /// Accepting a new question.
    Idle,
    /// A question is in flight; further input is rejected.
    Submitting,
}

/// An accepted question awaiting its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub session_id: String,
    pub query: String,
    /// Id of the optimistically appended user message.
    pub message_id: String,
}

/// Drives one view's follow-up exchanges.
#[derive(Debug)]
pub struct ConversationController {
    state: ConversationState,
    cancel: CancellationToken,
}

impl ConversationController {
    /// `cancel` fires when the view's consumer is torn down.
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            state: ConversationState::Idle,
            cancel,
        }
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Accepts `question` and appends it to the view as a user message.
    ///
    /// Returns `None`, leaving the view untouched, when the question is blank,
    /// a submission is already in flight, or the view has been torn down.
    pub fn begin(&mut self, view: &mut SessionView, question: &str) -> Option<Submission> {
        let query = question.trim();
        if query.is_empty() || self.state == ConversationState::Submitting {
            return None;
        }
        if self.cancel.is_cancelled() {
            return None;
        }

        let message = ConversationMessage {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            text: query.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };
        let submission = Submission {
            session_id: view.session.id.clone(),
            query: query.to_string(),
            message_id: message.id.clone(),
        };
        view.conversation.push(message);
        self.state = ConversationState::Submitting;

        debug!(session_id = %submission.session_id, "follow-up question accepted");
        Some(submission)
    }

    /// Forwards the question. Resolves to `Cancelled` if the view is torn down
    /// first.
    pub async fn send(
        &self,
        backend: &dyn AnalysisBackend,
        submission: &Submission,
    ) -> Result<ConverseResult, WebsageError> {
        let request = ConverseRequest::for_session(&submission.session_id, &submission.query);
        let body = serde_json::to_vec(&request)
            .map(Bytes::from)
            .map_err(|e| WebsageError::Internal(format!("failed to encode converse request: {e}")))?;

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(WebsageError::Cancelled),
            response = backend.forward_converse(body) => {
                response?.parse::<ConverseResult>(Resource::Converse)
            }
        }
    }

    /// Reconciles the view with the outcome of [`send`](Self::send) and returns
    /// to `Idle`.
    ///
    /// Returns the appended assistant message. A torn-down view is not
    /// mutated and yields `None`.
    pub fn finish(
        &mut self,
        view: &mut SessionView,
        outcome: Result<ConverseResult, WebsageError>,
    ) -> Option<ConversationMessage> {
        self.state = ConversationState::Idle;
        if self.cancel.is_cancelled() || matches!(outcome, Err(WebsageError::Cancelled)) {
            debug!(session_id = %view.session.id, "view torn down, dropping answer");
            return None;
        }

        let text = match outcome {
            Ok(result) => {
                info!(
                    session_id = %view.session.id,
                    sources = result.context_sources.len(),
                    "follow-up answered"
                );
                let text = result.agent_response.clone();
                view.direct = Some(DirectResult::Converse(result));
                text
            }
            Err(e) => {
                warn!(session_id = %view.session.id, error = %e, "follow-up failed");
                e.user_message()
            }
        };

        let message = ConversationMessage {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Assistant,
            text,
            timestamp: Utc::now().to_rfc3339(),
        };
        view.conversation.push(message.clone());
        Some(message)
    }

    /// Runs a whole exchange: begin, send, finish.
    pub async fn submit(
        &mut self,
        backend: &dyn AnalysisBackend,
        view: &mut SessionView,
        question: &str,
    ) -> Option<ConversationMessage> {
        let submission = self.begin(view, question)?;
        let outcome = self.send(backend, &submission).await;
        self.finish(view, outcome)
    }
}
