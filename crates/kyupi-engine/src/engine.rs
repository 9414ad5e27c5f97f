// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record decision, detect mutual like, create match.

use std::sync::Arc;

use kyupi_core::types::{Decision, DecisionOutcome, Match, MatchSummary, Preference, UserId};
use kyupi_core::{CanonicalPair, KyupiError, MatchStore, Mutuality, PreferenceStore};
use tracing::{debug, info, warn};

/// Turns like/pass decisions into preferences and, when both sides like
/// each other, into exactly one match.
#[derive(Clone)]
pub struct MatchingEngine {
    preferences: Arc<dyn PreferenceStore>,
    matches: Arc<dyn MatchStore>,
}

impl MatchingEngine {
    pub fn new(preferences: Arc<dyn PreferenceStore>, matches: Arc<dyn MatchStore>) -> Self {
        Self {
            preferences,
            matches,
        }
    }

    /// Record `actor`'s decision about `target`.
    ///
    /// A like whose reciprocal like already exists creates (or finds) the
    /// pair's match and reports `matched = true`. If the reciprocal lookup
    /// fails, the error is returned; the preference stays recorded and
    /// [`reconcile`](Self::reconcile) finishes the detection later.
    pub async fn record_decision(
        &self,
        actor: &UserId,
        target: &UserId,
        decision: Decision,
    ) -> Result<DecisionOutcome, KyupiError> {
        if actor == target {
            return Err(KyupiError::InvalidSelfAction);
        }

        let preference = Preference::new(*actor, *target, decision);
        self.preferences.insert_preference(&preference).await?;
        debug!(actor = %actor, target = %target, %decision, "decision recorded");

        let match_record = match decision {
            Decision::Pass => None,
            Decision::Like => self.detect_match(actor, target).await?,
        };

        Ok(DecisionOutcome {
            preference,
            matched: match_record.is_some(),
            match_record,
        })
    }

    /// Re-run mutual-like detection for a pair without recording anything.
    ///
    /// Returns the pair's match when both directions are likes. Repeated
    /// calls return the same match.
    pub async fn reconcile(
        &self,
        actor: &UserId,
        target: &UserId,
    ) -> Result<Option<Match>, KyupiError> {
        CanonicalPair::new(*actor, *target)?;
        if !self.preferences.has_liked(actor, target).await? {
            return Ok(None);
        }
        self.detect_match(actor, target).await
    }

    /// Matches of `user`, newest first, each with the other member's identity.
    pub async fn list_matches(&self, user: &UserId) -> Result<Vec<MatchSummary>, KyupiError> {
        let matches = self.matches.list_for_identity(user).await?;
        Ok(matches
            .into_iter()
            .filter_map(|m| {
                m.counterpart(user).map(|other| MatchSummary {
                    id: m.id,
                    matched_user_id: other,
                    created_at: m.created_at,
                })
            })
            .collect())
    }

    /// `actor` is known to like `target`; look for the reciprocal like.
    async fn detect_match(
        &self,
        actor: &UserId,
        target: &UserId,
    ) -> Result<Option<Match>, KyupiError> {
        match Mutuality::from_lookup(self.preferences.has_liked(target, actor).await) {
            Mutuality::NotMutual => Ok(None),
            Mutuality::Indeterminate(err) => {
                warn!(actor = %actor, target = %target, error = %err, "mutuality check failed");
                Err(err)
            }
            Mutuality::Mutual => {
                let (record, created) = self.matches.create_if_absent(actor, target).await?;
                if created {
                    info!(match_id = %record.id, "match created");
                } else {
                    debug!(match_id = %record.id, "match already existed");
                }
                Ok(Some(record))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyupi_test_utils::{MemoryStore, StoreOp};
    use tracing_test::traced_test;

    fn engine_over(store: &MemoryStore) -> MatchingEngine {
        MatchingEngine::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn self_decision_is_rejected_before_storage() {
        let store = MemoryStore::new();
        let engine = engine_over(&store);
        let a = UserId::new();

        let err = engine
            .record_decision(&a, &a, Decision::Like)
            .await
            .unwrap_err();
        assert!(matches!(err, KyupiError::InvalidSelfAction));
        assert_eq!(store.calls(StoreOp::InsertPreference).await, 0);
    }

    #[tokio::test]
    async fn pass_never_checks_mutuality() {
        let store = MemoryStore::new();
        let engine = engine_over(&store);
        let (a, b) = (UserId::new(), UserId::new());

        engine.record_decision(&b, &a, Decision::Like).await.unwrap();
        let outcome = engine.record_decision(&a, &b, Decision::Pass).await.unwrap();

        assert!(!outcome.matched);
        assert!(outcome.match_record.is_none());
        assert_eq!(store.calls(StoreOp::HasLiked).await, 1);
        assert_eq!(store.match_count().await, 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn mutual_like_logs_match_creation() {
        let store = MemoryStore::new();
        let engine = engine_over(&store);
        let (a, b) = (UserId::new(), UserId::new());

        engine.record_decision(&a, &b, Decision::Like).await.unwrap();
        let outcome = engine.record_decision(&b, &a, Decision::Like).await.unwrap();

        assert!(outcome.matched);
        assert!(logs_contain("match created"));
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_mutuality_lookup_is_logged_and_returned() {
        let store = MemoryStore::new();
        let engine = engine_over(&store);
        let (a, b) = (UserId::new(), UserId::new());

        engine.record_decision(&a, &b, Decision::Like).await.unwrap();
        store.fail_on(StoreOp::HasLiked).await;

        let err = engine
            .record_decision(&b, &a, Decision::Like)
            .await
            .unwrap_err();
        assert!(matches!(err, KyupiError::StorageUnavailable { .. }));
        assert!(logs_contain("mutuality check failed"));
        assert_eq!(store.match_count().await, 0);
    }

    #[tokio::test]
    async fn reconcile_requires_both_likes() {
        let store = MemoryStore::new();
        let engine = engine_over(&store);
        let (a, b) = (UserId::new(), UserId::new());

        assert!(engine.reconcile(&a, &b).await.unwrap().is_none());
        engine.record_decision(&a, &b, Decision::Like).await.unwrap();
        assert!(engine.reconcile(&a, &b).await.unwrap().is_none());
        assert!(engine.reconcile(&b, &a).await.unwrap().is_none());
        assert!(matches!(
            engine.reconcile(&a, &a).await,
            Err(KyupiError::InvalidPair)
        ));
    }

    #[tokio::test]
    async fn list_matches_reports_counterparts() {
        let store = MemoryStore::new();
        let engine = engine_over(&store);
        let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());

        for other in [b, c] {
            engine.record_decision(&a, &other, Decision::Like).await.unwrap();
            engine.record_decision(&other, &a, Decision::Like).await.unwrap();
        }

        let summaries = engine.list_matches(&a).await.unwrap();
        let counterparts: Vec<UserId> = summaries.iter().map(|s| s.matched_user_id).collect();
        assert_eq!(counterparts, vec![c, b]);

        let for_b = engine.list_matches(&b).await.unwrap();
        assert_eq!(for_b.len(), 1);
        assert_eq!(for_b[0].matched_user_id, a);
    }
}
