// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned backend payloads shaped like the analysis service's output.

use serde_json::{Value, json};
use websage_core::ProxyResponse;

/// A session list entry.
pub fn session(id: &str, url: &str) -> Value {
    json!({
        "id": id,
        "url": url,
        "created_at": "2025-03-01T09:00:00",
        "status": "completed",
        "ai_provider": "openai",
        "model": "gpt-4o-mini"
    })
}

/// A fully populated analysis detail for `url`.
pub fn detail(url: &str) -> Value {
    json!({
        "url": url,
        "analysis_timestamp": "2025-03-01T09:00:05",
        "company_info": {
            "industry": "Developer Tools",
            "company_size": "50-200",
            "location": "Berlin, Germany",
            "core_products_services": ["CI pipelines", "Build caching"],
            "unique_selling_proposition": "Fastest builds on the market",
            "target_audience": "Platform teams",
            "contact_info": {
                "email": "hello@acme.test",
                "phone": null,
                "social_media": {"linkedin": "https://linkedin.com/company/acme", "twitter": null}
            }
        },
        "extracted_answers": [
            {"question": "What do they sell?", "answer": "CI pipelines and build caching."}
        ]
    })
}

/// A stored exchange as returned by the history endpoint.
pub fn history_entry(user_query: &str, agent_response: &str, created_at: &str) -> Value {
    json!({
        "user_query": user_query,
        "agent_response": agent_response,
        "created_at": created_at
    })
}

/// A successful converse answer.
pub fn converse(url: &str, user_query: &str, agent_response: &str) -> Value {
    json!({
        "url": url,
        "user_query": user_query,
        "agent_response": agent_response,
        "context_sources": [url]
    })
}

/// `200` with `value` serialized as the body.
pub fn ok(value: Value) -> ProxyResponse {
    status(200, value)
}

/// `status` with `value` serialized as the body.
pub fn status(status: u16, value: Value) -> ProxyResponse {
    ProxyResponse::new(status, value.to_string())
}
