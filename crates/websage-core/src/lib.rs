// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the WebSage gateway.
//!
//! This crate provides the shared domain types, the error taxonomy, and the
//! [`AnalysisBackend`] trait that the proxy implements and the session layer
//! consumes.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::WebsageError;
pub use traits::AnalysisBackend;
pub use types::{
    AnalysisDetail, AnalyzeRequest, CompanyInfo, ContactInfo, ConversationHistoryEntry,
    ConversationMessage, ConverseRequest, ConverseResult, ProxyResponse, QaExchange, QaItem,
    Resource, Role, Session, SocialMedia, parse_timestamp,
};
