// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identities, entities, and outcome types shared across the Kyupi workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::error::KyupiError;
use crate::pair::CanonicalPair;

/// Timestamp layout used for every stored `created_at` / `updated_at`.
///
/// Fixed width so that text comparison in SQL orders chronologically.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Current UTC time rendered with [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Lowercase hyphenated form; this is the canonical text stored in SQL.
                write!(f, "{}", self.0.as_hyphenated())
            }
        }

        impl FromStr for $name {
            type Err = KyupiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| KyupiError::InvalidInput(format!("invalid {}", $what)))
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

uuid_id!(
    /// Opaque, totally ordered identity of a user.
    ///
    /// Ordering follows the UUID bytes, which coincides with the ordering of
    /// the lowercase hyphenated text form used as the storage key.
    UserId,
    "user id"
);

uuid_id!(
    /// Identifier of a [`Match`].
    MatchId,
    "match_id"
);

uuid_id!(
    /// Identifier of a [`Message`].
    MessageId,
    "message id"
);

uuid_id!(
    /// Identifier of a [`Preference`].
    PreferenceId,
    "preference id"
);

/// A user's decision toward another user.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Decision {
    Like,
    Pass,
}

/// One actor's recorded decision toward one target. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub id: PreferenceId,
    pub actor_id: UserId,
    pub target_id: UserId,
    #[serde(rename = "status")]
    pub decision: Decision,
    pub created_at: String,
    pub updated_at: String,
}

impl Preference {
    /// Build a new, not-yet-persisted preference stamped with the current time.
    pub fn new(actor_id: UserId, target_id: UserId, decision: Decision) -> Self {
        let now = now_timestamp();
        Self {
            id: PreferenceId::new(),
            actor_id,
            target_id,
            decision,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// The durable record that two users liked each other.
///
/// Always stored with `user_low < user_high`. Serialized as
/// `identity_low` / `identity_high`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    #[serde(rename = "identity_low")]
    pub user_low: UserId,
    #[serde(rename = "identity_high")]
    pub user_high: UserId,
    pub created_at: String,
    pub updated_at: String,
}

impl Match {
    /// Build a new, not-yet-persisted match for a canonical pair.
    pub fn new(pair: CanonicalPair) -> Self {
        let now = now_timestamp();
        Self {
            id: MatchId::new(),
            user_low: pair.low(),
            user_high: pair.high(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether `user` is one of the two members.
    pub fn is_member(&self, user: &UserId) -> bool {
        self.user_low == *user || self.user_high == *user
    }

    /// The member that is not `user`, or `None` if `user` is not a member.
    pub fn counterpart(&self, user: &UserId) -> Option<UserId> {
        if self.user_low == *user {
            Some(self.user_high)
        } else if self.user_high == *user {
            Some(self.user_low)
        } else {
            None
        }
    }
}

/// A chat message between the two members of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub match_id: MatchId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub created_at: String,
}

/// Result of recording a like/pass decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionOutcome {
    /// The preference that was recorded.
    #[serde(rename = "like")]
    pub preference: Preference,
    /// The match for the pair, present only when `matched` is true.
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_record: Option<Match>,
    pub matched: bool,
}

/// A match as seen by one of its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub id: MatchId,
    pub matched_user_id: UserId,
    pub created_at: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Gateway,
}
