// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Kyupi matching backend.
//!
//! This crate provides the identity and entity types, the canonical pair
//! ordering used as the match storage key, the error taxonomy, and the store
//! traits implemented by storage backends.

pub mod error;
pub mod pair;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::KyupiError;
pub use pair::{CanonicalPair, Mutuality};
pub use types::{
    AdapterType, Decision, DecisionOutcome, HealthStatus, Match, MatchId, MatchSummary, Message,
    MessageId, Preference, PreferenceId, UserId,
};

pub use traits::{MatchStore, MessageStore, PluginAdapter, PreferenceStore, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn client_errors_are_classified() {
        assert!(KyupiError::InvalidPair.is_client_error());
        assert!(KyupiError::InvalidSelfAction.is_client_error());
        assert!(KyupiError::DecisionAlreadyExists.is_client_error());
        assert!(KyupiError::NoActiveMatch.is_client_error());
        assert!(KyupiError::NotAMatchMember.is_client_error());
        assert!(KyupiError::InvalidInput("x".into()).is_client_error());
        assert!(!KyupiError::storage(std::io::Error::other("down")).is_client_error());
        assert!(!KyupiError::Internal("x".into()).is_client_error());
    }

    #[test]
    fn denial_messages_do_not_mention_preferences() {
        for err in [KyupiError::NoActiveMatch, KyupiError::NotAMatchMember] {
            let text = err.to_string();
            assert!(!text.contains("like"), "denial leaked preference detail: {text}");
        }
    }

    #[test]
    fn decision_parses_and_displays_lowercase() {
        assert_eq!(Decision::from_str("like").unwrap(), Decision::Like);
        assert_eq!(Decision::from_str("pass").unwrap(), Decision::Pass);
        assert!(Decision::from_str("maybe").is_err());
        assert_eq!(Decision::Like.as_ref(), "like");
        assert_eq!(Decision::Pass.to_string(), "pass");

        let json = serde_json::to_string(&Decision::Like).unwrap();
        assert_eq!(json, "\"like\"");
    }

    #[test]
    fn user_id_parses_canonical_text() {
        let id = UserId::new();
        let parsed = UserId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);

        let upper = id.to_string().to_uppercase();
        assert_eq!(UserId::from_str(&upper).unwrap(), id);
        assert_eq!(UserId::from_str(&upper).unwrap().to_string(), id.to_string());

        assert!(matches!(
            UserId::from_str("not-a-uuid"),
            Err(KyupiError::InvalidInput(_))
        ));
    }

    #[test]
    fn match_counterpart_and_membership() {
        let a = UserId::new();
        let b = UserId::new();
        let outsider = UserId::new();
        let m = Match::new(CanonicalPair::new(a, b).unwrap());

        assert!(m.user_low < m.user_high);
        assert!(m.is_member(&a));
        assert!(m.is_member(&b));
        assert!(!m.is_member(&outsider));
        assert_eq!(m.counterpart(&a), Some(b));
        assert_eq!(m.counterpart(&b), Some(a));
        assert_eq!(m.counterpart(&outsider), None);
    }

    #[test]
    fn decision_outcome_serializes_match_only_when_present() {
        let a = UserId::new();
        let b = UserId::new();
        let pending = DecisionOutcome {
            preference: Preference::new(a, b, Decision::Like),
            match_record: None,
            matched: false,
        };
        let json = serde_json::to_value(&pending).unwrap();
        assert!(json.get("match").is_none());
        assert_eq!(json["matched"], false);
        assert_eq!(json["like"]["status"], "like");
        assert!(json["like"].get("decision").is_none());

        let matched = DecisionOutcome {
            match_record: Some(Match::new(CanonicalPair::new(a, b).unwrap())),
            matched: true,
            ..pending
        };
        let json = serde_json::to_value(&matched).unwrap();
        assert!(json["match"]["id"].is_string());
    }

    #[test]
    fn match_serializes_pair_as_identity_low_and_high() {
        let a = UserId::new();
        let b = UserId::new();
        let pair = CanonicalPair::new(a, b).unwrap();
        let m = Match::new(pair);

        let json = serde_json::to_value(&m).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["created_at", "id", "identity_high", "identity_low", "updated_at"]
        );
        assert_eq!(json["identity_low"], pair.low().to_string());
        assert_eq!(json["identity_high"], pair.high().to_string());

        let back: Match = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn timestamps_have_fixed_width() {
        let a = types::now_timestamp();
        let b = types::now_timestamp();
        assert_eq!(a.len(), b.len());
        assert!(a.ends_with('Z'));
        assert!(a <= b);
    }

    #[test]
    fn all_store_traits_are_object_safe() {
        fn _assert_storage(_: &dyn StorageAdapter) {}
        fn _assert_preferences(_: &dyn PreferenceStore) {}
        fn _assert_matches(_: &dyn MatchStore) {}
        fn _assert_messages(_: &dyn MessageStore) {}
    }
}
