// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expansion of stored exchanges into client-facing messages.

use websage_core::{ConversationHistoryEntry, ConversationMessage, Role, parse_timestamp};

/// Expands each entry into a user message followed by an assistant message.
///
/// Entries are ordered by `created_at` when every timestamp parses; otherwise
/// the upstream order is kept. The sort is stable, so entries sharing a
/// timestamp stay in upstream order.
pub fn expand_history(mut entries: Vec<ConversationHistoryEntry>) -> Vec<ConversationMessage> {
    let parsed: Option<Vec<_>> = entries
        .iter()
        .map(|e| parse_timestamp(&e.created_at))
        .collect();
    if let Some(times) = parsed {
        let mut keyed: Vec<_> = times.into_iter().zip(entries).collect();
        keyed.sort_by_key(|(at, _)| *at);
        entries = keyed.into_iter().map(|(_, e)| e).collect();
    }

    entries
        .into_iter()
        .enumerate()
        .flat_map(|(index, entry)| {
            let stem = if entry.created_at.is_empty() {
                format!("history-{index}")
            } else {
                entry.created_at.clone()
            };
            [
                ConversationMessage {
                    id: format!("{stem}-u"),
                    role: Role::User,
                    text: entry.user_query,
                    timestamp: entry.created_at.clone(),
                },
                ConversationMessage {
                    id: format!("{stem}-a"),
                    role: Role::Assistant,
                    text: entry.agent_response,
                    timestamp: entry.created_at,
                },
            ]
        })
        .collect()
}
