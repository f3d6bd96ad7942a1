// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The merged session view and its serializable projection.
//!
//! Multi-source fields resolve in a fixed order: the most recent direct result
//! of this interaction, then the stored analysis detail, then the session list
//! entry. Missing values never fail; they fall back to fixed placeholder text.

use serde::Serialize;
use strum::Display;
use url::Url;

use websage_core::{
    AnalysisDetail, CompanyInfo, ContactInfo, ConversationMessage, ConverseResult, QaItem, Role,
    Session,
};

/// Placeholder for company fields the backend did not supply.
pub const NOT_AVAILABLE: &str = "Not available";

/// Placeholder for the URL and original query when no source has one.
pub const NO_VALUE: &str = "-";

/// Shown in place of an answer before any question has been asked.
pub const AWAITING_ANALYSIS: &str = "Ask a question below to see the analysis.";

/// Title used when the session has no URL at all.
pub const DEFAULT_TITLE: &str = "Session";

/// A resource whose failure was absorbed into placeholder values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PartialData {
    Detail,
    History,
}

/// Result of an explicit analyze or converse action in the current interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectResult {
    Analyze(AnalysisDetail),
    Converse(ConverseResult),
}

/// Everything known about one session, before projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub session: Session,
    pub detail: Option<AnalysisDetail>,
    pub conversation: Vec<ConversationMessage>,
    pub direct: Option<DirectResult>,
    pub degraded: Vec<PartialData>,
}

impl SessionView {
    /// A view holding only the session entry.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            detail: None,
            conversation: Vec::new(),
            direct: None,
            degraded: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session.id
    }

    fn converse_result(&self) -> Option<&ConverseResult> {
        match &self.direct {
            Some(DirectResult::Converse(result)) => Some(result),
            _ => None,
        }
    }

    /// The direct analyze result if there is one, else the stored detail.
    fn effective_detail(&self) -> Option<&AnalysisDetail> {
        match &self.direct {
            Some(DirectResult::Analyze(detail)) => Some(detail),
            _ => self.detail.as_ref(),
        }
    }

    fn first_answer(&self) -> Option<&QaItem> {
        self.effective_detail()
            .and_then(|d| d.extracted_answers.first())
    }

    pub fn url(&self) -> &str {
        let direct = match &self.direct {
            Some(DirectResult::Analyze(detail)) => Some(detail.url.as_str()),
            Some(DirectResult::Converse(result)) => Some(result.url.as_str()),
            None => None,
        };
        [
            direct,
            self.detail.as_ref().map(|d| d.url.as_str()),
            Some(self.session.url.as_str()),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .unwrap_or(NO_VALUE)
    }

    pub fn original_query(&self) -> &str {
        self.converse_result()
            .map(|r| r.user_query.as_str())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                self.first_answer()
                    .map(|qa| qa.question.as_str())
                    .filter(|s| !s.trim().is_empty())
            })
            .or_else(|| {
                self.conversation
                    .iter()
                    .find(|m| m.role == Role::User)
                    .map(|m| m.text.as_str())
            })
            .unwrap_or(NO_VALUE)
    }

    pub fn ai_response(&self) -> &str {
        self.converse_result()
            .map(|r| r.agent_response.as_str())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                self.first_answer()
                    .map(|qa| qa.answer.as_str())
                    .filter(|s| !s.trim().is_empty())
            })
            .unwrap_or(AWAITING_ANALYSIS)
    }

    pub fn context_sources(&self) -> &[String] {
        self.converse_result()
            .map(|r| r.context_sources.as_slice())
            .unwrap_or_default()
    }

    pub fn extracted_qa(&self) -> &[QaItem] {
        self.effective_detail()
            .map(|d| d.extracted_answers.as_slice())
            .unwrap_or_default()
    }

    pub fn company_insights(&self) -> CompanyInsights {
        CompanyInsights::from_company_info(self.effective_detail().map(|d| &d.company_info))
    }

    /// Host of the session URL, else the raw URL, else [`DEFAULT_TITLE`].
    pub fn title(&self) -> String {
        let url = self.url();
        if url == NO_VALUE {
            return DEFAULT_TITLE.to_string();
        }
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| url.to_string())
    }

    /// Projects the view into the shape handed to renderers.
    pub fn to_view_model(&self) -> SessionViewModel {
        SessionViewModel {
            session: SessionSummary {
                id: self.session.id.clone(),
                url: self.url().to_string(),
                created_at: self.session.created_at.clone(),
                status: self.session.status.clone(),
            },
            query: QuerySummary {
                original_query: self.original_query().to_string(),
                ai_response: self.ai_response().to_string(),
                context_sources: self.context_sources().to_vec(),
            },
            company_insights: self.company_insights(),
            extracted_qa: self.extracted_qa().to_vec(),
            conversation_history: self.conversation.clone(),
            degraded: self.degraded.clone(),
            title: self.title(),
        }
    }
}

/// Renderer-facing projection of a [`SessionView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionViewModel {
    pub session: SessionSummary,
    pub query: QuerySummary,
    pub company_insights: CompanyInsights,
    pub extracted_qa: Vec<QaItem>,
    pub conversation_history: Vec<ConversationMessage>,
    pub degraded: Vec<PartialData>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub url: String,
    pub created_at: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySummary {
    pub original_query: String,
    pub ai_response: String,
    pub context_sources: Vec<String>,
}

/// Company attributes with every gap filled by [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyInsights {
    pub industry: String,
    pub company_size: String,
    pub target_audience: String,
    pub business_model: String,
    pub location: String,
    pub core_products_services: Vec<String>,
    pub contact_info: ContactInfo,
}

impl CompanyInsights {
    pub fn from_company_info(info: Option<&CompanyInfo>) -> Self {
        let field = |pick: fn(&CompanyInfo) -> &Option<String>| -> String {
            info.and_then(|i| pick(i).as_deref())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };
        Self {
            industry: field(|i| &i.industry),
            company_size: field(|i| &i.company_size),
            target_audience: field(|i| &i.target_audience),
            business_model: field(|i| &i.unique_selling_proposition),
            location: field(|i| &i.location),
            core_products_services: info
                .and_then(|i| i.core_products_services.clone())
                .unwrap_or_default(),
            contact_info: info
                .and_then(|i| i.contact_info.clone())
                .unwrap_or_default(),
        }
    }

    /// Every scalar field is the placeholder.
    pub fn is_unavailable(&self) -> bool {
        [
            &self.industry,
            &self.company_size,
            &self.target_audience,
            &self.business_model,
            &self.location,
        ]
        .iter()
        .all(|v| v.as_str() == NOT_AVAILABLE)
    }
}
