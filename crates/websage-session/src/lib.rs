// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session view aggregation and the follow-up conversation state machine.
//!
//! - [`SessionAggregator`] fans out to the session list, detail, and history
//!   resources and merges them into one [`SessionView`], degrading instead of
//!   failing when detail or history is unavailable.
//! - [`ConversationController`] appends the user's question optimistically,
//!   forwards it, and reconciles the view with the answer or the error.

pub mod aggregator;
pub mod conversation;
pub mod history;
pub mod view;

pub use aggregator::SessionAggregator;
pub use conversation::{ConversationController, ConversationState, Submission};
pub use history::expand_history;
pub use view::{
    CompanyInsights, DirectResult, PartialData, QuerySummary, SessionSummary, SessionView,
    SessionViewModel,
};
