// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store with fault injection.
//!
//! Mirrors the SQLite semantics (directional preference uniqueness, one
//! match per canonical pair, chronological messages) so engine tests can run
//! without a database and can force any single operation to fail.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use kyupi_core::types::{Decision, Match, MatchId, Message, Preference, UserId};
use kyupi_core::{CanonicalPair, KyupiError, MatchStore, MessageStore, PreferenceStore};

/// Store operations that can be counted or made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    InsertPreference,
    GetPreference,
    HasLiked,
    MatchExists,
    CreateMatch,
    ListMatches,
    GetMatch,
    GetMatchForPair,
    AppendMessage,
    ListMessages,
}

#[derive(Default)]
struct State {
    preferences: HashMap<(UserId, UserId), Preference>,
    matches: Vec<Match>,
    messages: Vec<Message>,
    faults: HashSet<StoreOp>,
    calls: HashMap<StoreOp, usize>,
}

impl State {
    /// Count the call and fail it if a fault is armed for `op`.
    fn enter(&mut self, op: StoreOp) -> Result<(), KyupiError> {
        *self.calls.entry(op).or_default() += 1;
        if self.faults.contains(&op) {
            return Err(KyupiError::storage(format!("injected fault: {op:?}")));
        }
        Ok(())
    }

    fn find_pair(&self, pair: &CanonicalPair) -> Option<&Match> {
        self.matches
            .iter()
            .find(|m| m.user_low == pair.low() && m.user_high == pair.high())
    }
}

/// In-memory implementation of [`PreferenceStore`], [`MatchStore`] and
/// [`MessageStore`]. Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call to `op` fail with `StorageUnavailable`.
    pub async fn fail_on(&self, op: StoreOp) {
        self.state.lock().await.faults.insert(op);
    }

    /// Disarm all injected faults.
    pub async fn clear_faults(&self) {
        self.state.lock().await.faults.clear();
    }

    /// Number of times `op` has been invoked, including failed calls.
    pub async fn calls(&self, op: StoreOp) -> usize {
        self.state.lock().await.calls.get(&op).copied().unwrap_or(0)
    }

    pub async fn match_count(&self) -> usize {
        self.state.lock().await.matches.len()
    }

    pub async fn message_count(&self) -> usize {
        self.state.lock().await.messages.len()
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn insert_preference(&self, preference: &Preference) -> Result<(), KyupiError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::InsertPreference)?;
        if preference.actor_id == preference.target_id {
            return Err(KyupiError::InvalidSelfAction);
        }
        let key = (preference.actor_id, preference.target_id);
        if state.preferences.contains_key(&key) {
            return Err(KyupiError::DecisionAlreadyExists);
        }
        state.preferences.insert(key, preference.clone());
        Ok(())
    }

    async fn get_preference(
        &self,
        actor: &UserId,
        target: &UserId,
    ) -> Result<Option<Preference>, KyupiError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::GetPreference)?;
        Ok(state.preferences.get(&(*actor, *target)).cloned())
    }

    async fn has_liked(&self, actor: &UserId, target: &UserId) -> Result<bool, KyupiError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::HasLiked)?;
        Ok(state
            .preferences
            .get(&(*actor, *target))
            .is_some_and(|p| p.decision == Decision::Like))
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn exists(&self, a: &UserId, b: &UserId) -> Result<bool, KyupiError> {
        let pair = CanonicalPair::new(*a, *b)?;
        let mut state = self.state.lock().await;
        state.enter(StoreOp::MatchExists)?;
        Ok(state.find_pair(&pair).is_some())
    }

    async fn create_if_absent(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<(Match, bool), KyupiError> {
        let pair = CanonicalPair::new(*a, *b)?;
        let mut state = self.state.lock().await;
        state.enter(StoreOp::CreateMatch)?;
        if let Some(existing) = state.find_pair(&pair) {
            return Ok((existing.clone(), false));
        }
        let created = Match::new(pair);
        state.matches.push(created.clone());
        Ok((created, true))
    }

    async fn list_for_identity(&self, user: &UserId) -> Result<Vec<Match>, KyupiError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::ListMatches)?;
        // Insertion order stands in for rowid; newest first.
        Ok(state
            .matches
            .iter()
            .rev()
            .filter(|m| m.is_member(user))
            .cloned()
            .collect())
    }

    async fn get_match(&self, id: &MatchId) -> Result<Option<Match>, KyupiError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::GetMatch)?;
        Ok(state.matches.iter().find(|m| m.id == *id).cloned())
    }

    async fn get_match_for_pair(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Match>, KyupiError> {
        let pair = CanonicalPair::new(*a, *b)?;
        let mut state = self.state.lock().await;
        state.enter(StoreOp::GetMatchForPair)?;
        Ok(state.find_pair(&pair).cloned())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append_message(&self, message: &Message) -> Result<(), KyupiError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::AppendMessage)?;
        if !state.matches.iter().any(|m| m.id == message.match_id) {
            return Err(KyupiError::storage("message references unknown match"));
        }
        state.messages.push(message.clone());
        Ok(())
    }

    async fn list_messages(&self, match_id: &MatchId) -> Result<Vec<Message>, KyupiError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::ListMessages)?;
        let mut messages: Vec<Message> = state
            .messages
            .iter()
            .filter(|m| m.match_id == *match_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }
}
