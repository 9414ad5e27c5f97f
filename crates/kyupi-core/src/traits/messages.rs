// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence contract for the per-match message log.

use async_trait::async_trait;

use crate::error::KyupiError;
use crate::types::{MatchId, Message};

/// Append-only message log keyed by match.
///
/// The store does no authorization of its own; callers go through the chat
/// gate first.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message to its match's log.
    async fn append_message(&self, message: &Message) -> Result<(), KyupiError>;

    /// All messages of a match in chronological order.
    async fn list_messages(&self, match_id: &MatchId) -> Result<Vec<Message>, KyupiError>;
}
