// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence contract for like/pass decisions.

use async_trait::async_trait;

use crate::error::KyupiError;
use crate::types::{Preference, UserId};

/// Stores one immutable decision per ordered `(actor, target)` pair.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Persist a new decision.
    ///
    /// Returns [`KyupiError::DecisionAlreadyExists`] if the actor already
    /// decided on this target; the stored row is left untouched.
    async fn insert_preference(&self, preference: &Preference) -> Result<(), KyupiError>;

    /// Fetch the decision `actor` made about `target`, if any.
    async fn get_preference(
        &self,
        actor: &UserId,
        target: &UserId,
    ) -> Result<Option<Preference>, KyupiError>;

    /// Whether `actor` recorded a like toward `target`.
    async fn has_liked(&self, actor: &UserId, target: &UserId) -> Result<bool, KyupiError>;
}
