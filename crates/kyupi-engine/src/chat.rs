// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Match-gated chat.
//!
//! Sending requires a match between sender and receiver; reading requires
//! the requester to be a member of the requested match. Denials carry fixed
//! messages so callers learn nothing about one-sided preferences.

use std::sync::Arc;

use kyupi_config::model::ChatConfig;
use kyupi_core::types::{MatchId, Message, MessageId, UserId, now_timestamp};
use kyupi_core::{CanonicalPair, KyupiError, MatchStore, MessageStore};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct ChatGate {
    matches: Arc<dyn MatchStore>,
    messages: Arc<dyn MessageStore>,
    max_message_length: usize,
}

impl ChatGate {
    pub fn new(
        matches: Arc<dyn MatchStore>,
        messages: Arc<dyn MessageStore>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            matches,
            messages,
            max_message_length: config.max_message_length,
        }
    }

    /// Whether `requester` and `counterpart` share a match.
    pub async fn authorize(
        &self,
        requester: &UserId,
        counterpart: &UserId,
    ) -> Result<bool, KyupiError> {
        CanonicalPair::new(*requester, *counterpart)?;
        self.matches.exists(requester, counterpart).await
    }

    /// Store a message from `sender` to `receiver` under the pair's match.
    ///
    /// `match_id`, when given, must name that same match.
    pub async fn send_message(
        &self,
        sender: &UserId,
        receiver: &UserId,
        match_id: Option<MatchId>,
        content: &str,
    ) -> Result<Message, KyupiError> {
        self.validate_content(content)?;
        CanonicalPair::new(*sender, *receiver)?;

        let Some(record) = self.matches.get_match_for_pair(sender, receiver).await? else {
            warn!(sender = %sender, "send denied: no match with receiver");
            return Err(KyupiError::NoActiveMatch);
        };
        if match_id.is_some_and(|id| id != record.id) {
            warn!(sender = %sender, "send denied: match id does not belong to pair");
            return Err(KyupiError::NoActiveMatch);
        }

        let message = Message {
            id: MessageId::new(),
            match_id: record.id,
            sender_id: *sender,
            receiver_id: *receiver,
            content: content.to_string(),
            created_at: now_timestamp(),
        };
        self.messages.append_message(&message).await?;
        debug!(message_id = %message.id, match_id = %record.id, "message stored");
        Ok(message)
    }

    /// Messages of `match_id`, oldest first, for a member of that match.
    ///
    /// An unknown match and a match the requester is not in are reported
    /// identically.
    pub async fn read_messages(
        &self,
        requester: &UserId,
        match_id: &MatchId,
    ) -> Result<Vec<Message>, KyupiError> {
        let is_member = self
            .matches
            .get_match(match_id)
            .await?
            .is_some_and(|m| m.is_member(requester));
        if !is_member {
            warn!(requester = %requester, match_id = %match_id, "read denied");
            return Err(KyupiError::NotAMatchMember);
        }
        self.messages.list_messages(match_id).await
    }

    fn validate_content(&self, content: &str) -> Result<(), KyupiError> {
        if content.trim().is_empty() {
            return Err(KyupiError::InvalidInput(
                "content must not be empty".to_string(),
            ));
        }
        let length = content.chars().count();
        if length > self.max_message_length {
            return Err(KyupiError::InvalidInput(format!(
                "content is {length} characters, limit is {}",
                self.max_message_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyupi_test_utils::{MemoryStore, StoreOp};

    fn gate_over(store: &MemoryStore, max_message_length: usize) -> ChatGate {
        ChatGate::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            &ChatConfig { max_message_length },
        )
    }

    async fn matched_pair(store: &MemoryStore) -> (UserId, UserId, MatchId) {
        let (a, b) = (UserId::new(), UserId::new());
        let (m, _) = store.create_if_absent(&a, &b).await.unwrap();
        (a, b, m.id)
    }

    #[tokio::test]
    async fn authorize_follows_match_existence() {
        let store = MemoryStore::new();
        let gate = gate_over(&store, 100);
        let (a, b, _) = matched_pair(&store).await;

        assert!(gate.authorize(&a, &b).await.unwrap());
        assert!(gate.authorize(&b, &a).await.unwrap());
        assert!(!gate.authorize(&a, &UserId::new()).await.unwrap());
        assert!(matches!(
            gate.authorize(&a, &a).await,
            Err(KyupiError::InvalidPair)
        ));
    }

    #[tokio::test]
    async fn send_uses_the_pair_match_id() {
        let store = MemoryStore::new();
        let gate = gate_over(&store, 100);
        let (a, b, match_id) = matched_pair(&store).await;

        let sent = gate.send_message(&b, &a, None, "hey").await.unwrap();
        assert_eq!(sent.match_id, match_id);
        assert_eq!(sent.sender_id, b);
        assert_eq!(sent.receiver_id, a);

        let explicit = gate
            .send_message(&a, &b, Some(match_id), "hi")
            .await
            .unwrap();
        assert_eq!(explicit.match_id, match_id);
    }

    #[tokio::test]
    async fn foreign_match_id_is_denied() {
        let store = MemoryStore::new();
        let gate = gate_over(&store, 100);
        let (a, b, _) = matched_pair(&store).await;
        let (_, _, other_match) = matched_pair(&store).await;

        let err = gate
            .send_message(&a, &b, Some(other_match), "sneaky")
            .await
            .unwrap_err();
        assert!(matches!(err, KyupiError::NoActiveMatch));
        assert_eq!(store.message_count().await, 0);
    }

    #[tokio::test]
    async fn content_limits_are_checked_in_characters() {
        let store = MemoryStore::new();
        let gate = gate_over(&store, 3);
        let (a, b, _) = matched_pair(&store).await;

        assert!(gate.send_message(&a, &b, None, "héé").await.is_ok());
        assert!(matches!(
            gate.send_message(&a, &b, None, "four").await,
            Err(KyupiError::InvalidInput(_))
        ));
        assert!(matches!(
            gate.send_message(&a, &b, None, "   ").await,
            Err(KyupiError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn non_member_read_never_reaches_message_store() {
        let store = MemoryStore::new();
        let gate = gate_over(&store, 100);
        let (_, _, match_id) = matched_pair(&store).await;
        let outsider = UserId::new();

        let err = gate.read_messages(&outsider, &match_id).await.unwrap_err();
        assert!(matches!(err, KyupiError::NotAMatchMember));

        let err = gate
            .read_messages(&outsider, &MatchId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, KyupiError::NotAMatchMember));

        assert_eq!(store.calls(StoreOp::ListMessages).await, 0);
    }

    #[tokio::test]
    async fn match_lookup_failure_is_not_a_denial() {
        let store = MemoryStore::new();
        let gate = gate_over(&store, 100);
        let (a, b, match_id) = matched_pair(&store).await;
        store.fail_on(StoreOp::GetMatch).await;
        store.fail_on(StoreOp::GetMatchForPair).await;

        assert!(matches!(
            gate.read_messages(&a, &match_id).await,
            Err(KyupiError::StorageUnavailable { .. })
        ));
        assert!(matches!(
            gate.send_message(&a, &b, None, "hello").await,
            Err(KyupiError::StorageUnavailable { .. })
        ));
    }
}
