// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire and domain types shared by the proxy, aggregator, and gateway.
//!
//! Every upstream entity has an explicit schema here. Fields the backend may
//! omit or send as `null` map to `Option` or to the type's default, so a sparse
//! payload never fails to shape.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::error::WebsageError;

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One analysis session as listed by `GET /analyze/sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Social profile links keyed by network name (`linkedin`, `twitter`, ...).
pub type SocialMedia = BTreeMap<String, Option<String>>;

/// Contact details scraped from the analysed site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,
}

/// Company attributes inferred by the backend. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub core_products_services: Option<Vec<String>>,
    #[serde(default)]
    pub unique_selling_proposition: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub contact_info: Option<ContactInfo>,
}

/// A question the backend answered during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaItem {
    pub question: String,
    pub answer: String,
}

/// Body of `GET /analyze/sessions/{id}` and of a successful `POST /analyze`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub analysis_timestamp: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_info: CompanyInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extracted_answers: Vec<QaItem>,
}

/// One stored question/answer exchange from `GET /converse/history/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistoryEntry {
    pub user_query: String,
    pub agent_response: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

/// Author of a conversation message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Client-facing conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: String,
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<String>>,
}

/// A prior exchange replayed to the backend as conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaExchange {
    pub user_query: String,
    pub agent_response: String,
}

/// Body of `POST /converse`. Either `url` or `session_id` selects the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<QaExchange>>,
}

impl ConverseRequest {
    /// A follow-up question about an existing session.
    pub fn for_session(session_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Successful body of `POST /converse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverseResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_query: String,
    pub agent_response: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context_sources: Vec<String>,
}

/// Backend resources reachable through the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Resource {
    #[strum(serialize = "analyze")]
    Analyze,
    #[strum(serialize = "session list")]
    SessionList,
    #[strum(serialize = "session detail")]
    SessionDetail,
    #[strum(serialize = "converse")]
    Converse,
    #[strum(serialize = "conversation history")]
    History,
}

impl Resource {
    /// Body substituted when the upstream answers with something that is not JSON.
    pub fn fallback_body(self) -> Bytes {
        match self {
            Resource::SessionList | Resource::History => Bytes::from_static(b"[]"),
            Resource::Analyze | Resource::SessionDetail | Resource::Converse => {
                Bytes::from_static(b"{}")
            }
        }
    }
}

/// The upstream status and body, exactly as the backend produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ProxyResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `200 []`, the degraded session listing.
    pub fn empty_list() -> Self {
        Self::new(200, Bytes::from_static(b"[]"))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Converts a non-2xx response into [`WebsageError::UpstreamError`].
    pub fn into_success(self) -> Result<Self, WebsageError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(WebsageError::UpstreamError {
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Shapes the body into `T` without looking at the status.
    pub fn json<T: DeserializeOwned>(&self, resource: Resource) -> Result<T, WebsageError> {
        serde_json::from_slice(&self.body).map_err(|e| WebsageError::MalformedResponse {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }

    /// Requires a 2xx status, then shapes the body into `T`.
    pub fn parse<T: DeserializeOwned>(self, resource: Resource) -> Result<T, WebsageError> {
        self.into_success()?.json(resource)
    }
}

/// Parses a backend timestamp.
///
/// Accepts RFC 3339 as well as the offset-less ISO form the backend emits for
/// naive datetimes, which is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
