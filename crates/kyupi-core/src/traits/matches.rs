// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence contract for canonical matches.

use async_trait::async_trait;

use crate::error::KyupiError;
use crate::types::{Match, MatchId, UserId};

/// Stores at most one [`Match`] per unordered user pair.
///
/// Every method that takes two identities canonicalizes them first, so
/// argument order never matters. Identical identities yield
/// [`KyupiError::InvalidPair`].
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Whether a match exists for the pair.
    async fn exists(&self, a: &UserId, b: &UserId) -> Result<bool, KyupiError>;

    /// Insert the match for the pair, or return the one already stored.
    ///
    /// Safe under concurrent callers: exactly one caller observes
    /// `created == true`, every other caller gets the existing row.
    async fn create_if_absent(&self, a: &UserId, b: &UserId)
    -> Result<(Match, bool), KyupiError>;

    /// Matches in which `user` is either member, newest first.
    async fn list_for_identity(&self, user: &UserId) -> Result<Vec<Match>, KyupiError>;

    /// Fetch a match by id.
    async fn get_match(&self, id: &MatchId) -> Result<Option<Match>, KyupiError>;

    /// Fetch the match for the pair, if any.
    async fn get_match_for_pair(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Match>, KyupiError>;
}
