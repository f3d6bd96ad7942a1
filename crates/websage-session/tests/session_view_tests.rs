// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end session view and follow-up flows against a scripted backend.

use std::sync::Arc;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use websage_core::{ProxyResponse, Resource, Role, WebsageError};
use websage_session::view::{AWAITING_ANALYSIS, NOT_AVAILABLE};
use websage_session::{ConversationController, PartialData, SessionAggregator};
use websage_test_utils::{MockBackend, fixtures};

#[tokio::test]
async fn failing_detail_degrades_but_view_is_built() {
    let backend = MockBackend::new()
        .with_response(
            Resource::SessionList,
            fixtures::ok(json!([
                {"id": "s1", "url": "https://a.com", "status": "done", "created_at": "T0"}
            ])),
        )
        .with_error(
            Resource::SessionDetail,
            WebsageError::UpstreamUnreachable {
                backend_url: "http://localhost:8000".into(),
                message: "connection refused".into(),
                source: None,
            },
        )
        .with_response(
            Resource::History,
            fixtures::ok(json!([fixtures::history_entry("Q", "A", "T1")])),
        );
    let aggregator = SessionAggregator::new(Arc::new(backend));

    let view = aggregator.load_session_view("s1").await.unwrap();
    let model = view.to_view_model();

    assert_eq!(model.session.id, "s1");
    assert_eq!(model.session.url, "https://a.com");
    assert_eq!(model.session.status, "done");
    assert_eq!(model.session.created_at, "T0");
    assert_eq!(model.company_insights.industry, NOT_AVAILABLE);
    assert_eq!(model.company_insights.company_size, NOT_AVAILABLE);
    assert_eq!(model.company_insights.target_audience, NOT_AVAILABLE);
    assert_eq!(model.company_insights.business_model, NOT_AVAILABLE);
    assert_eq!(model.company_insights.location, NOT_AVAILABLE);
    assert!(model.extracted_qa.is_empty());
    assert_eq!(model.degraded, [PartialData::Detail]);

    assert_eq!(model.conversation_history.len(), 2);
    assert_eq!(model.conversation_history[0].role, Role::User);
    assert_eq!(model.conversation_history[0].text, "Q");
    assert_eq!(model.conversation_history[1].role, Role::Assistant);
    assert_eq!(model.conversation_history[1].text, "A");
    assert_eq!(model.query.original_query, "Q");
    assert_eq!(model.query.ai_response, AWAITING_ANALYSIS);
    assert_eq!(model.title, "a.com");
}

#[tokio::test]
async fn non_success_detail_status_degrades() {
    let backend = MockBackend::new()
        .with_response(
            Resource::SessionList,
            fixtures::ok(json!([fixtures::session("s1", "https://a.com")])),
        )
        .with_response(
            Resource::SessionDetail,
            ProxyResponse::new(404, r#"{"detail":"Session not found"}"#),
        );
    let aggregator = SessionAggregator::new(Arc::new(backend));

    let view = aggregator.load_session_view("s1").await.unwrap();
    assert!(view.detail.is_none());
    assert!(view.company_insights().is_unavailable());
    assert!(view.conversation.is_empty());
    assert!(!view.degraded.contains(&PartialData::History));
}

#[tokio::test]
async fn unconfigured_backend_reports_not_found() {
    let aggregator = SessionAggregator::new(Arc::new(MockBackend::unconfigured()));
    let err = aggregator.load_session_view("s1").await.unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.to_string(), "Session not found");
}

#[tokio::test]
async fn follow_up_extends_loaded_view() {
    let backend = Arc::new(
        MockBackend::new()
            .with_response(
                Resource::SessionList,
                fixtures::ok(json!([fixtures::session("s1", "https://acme.test")])),
            )
            .with_response(
                Resource::SessionDetail,
                fixtures::ok(fixtures::detail("https://acme.test")),
            )
            .with_response(
                Resource::History,
                fixtures::ok(json!([
                    fixtures::history_entry("Later?", "Yes.", "2025-03-01T11:00:00"),
                    fixtures::history_entry("Earlier?", "No.", "2025-03-01T10:00:00"),
                ])),
            )
            .with_response(
                Resource::Converse,
                fixtures::ok(fixtures::converse(
                    "https://acme.test",
                    "Who founded it?",
                    "Two former SREs.",
                )),
            ),
    );
    let aggregator = SessionAggregator::new(backend.clone());
    let mut view = aggregator.load_session_view("s1").await.unwrap();

    let texts: Vec<_> = view.conversation.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["Earlier?", "No.", "Later?", "Yes."]);
    assert_eq!(view.original_query(), "What do they sell?");

    let mut controller = ConversationController::new(CancellationToken::new());
    controller
        .submit(backend.as_ref(), &mut view, "Who founded it?")
        .await
        .unwrap();

    let model = view.to_view_model();
    assert_eq!(model.conversation_history.len(), 6);
    assert_eq!(model.conversation_history[4].role, Role::User);
    assert_eq!(model.conversation_history[5].text, "Two former SREs.");
    assert_eq!(model.query.original_query, "Who founded it?");
    assert_eq!(model.query.context_sources, ["https://acme.test".to_string()]);
    assert_eq!(model.company_insights.industry, "Developer Tools");
}
