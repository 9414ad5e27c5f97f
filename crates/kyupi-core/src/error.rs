// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Kyupi matching backend.

use thiserror::Error;

/// The primary error type used across store traits, the matching engine,
/// and the chat gate.
///
/// Validation and authorization variants are terminal client errors.
/// [`KyupiError::StorageUnavailable`] is the only transient variant and is
/// never folded into a "not matched" answer.
#[derive(Debug, Error)]
pub enum KyupiError {
    /// Two identical identities were passed where a pair of distinct users is required.
    #[error("invalid pair: an identity cannot be paired with itself")]
    InvalidPair,

    /// A user tried to like or pass themselves.
    #[error("cannot like or pass yourself")]
    InvalidSelfAction,

    /// The actor already recorded a decision toward this target.
    #[error("you have already liked or passed this user")]
    DecisionAlreadyExists,

    /// Chat send refused: the two users are not matched.
    #[error("no active match found between users")]
    NoActiveMatch,

    /// Chat read refused: the requester is not a member of the match.
    #[error("not authorized to view messages for this match")]
    NotAMatchMember,

    /// The backing store failed or timed out.
    #[error("storage unavailable: {source}")]
    StorageUnavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed request data (bad identifier, empty message, oversized content).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors surfaced at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KyupiError {
    /// Wrap any error as [`KyupiError::StorageUnavailable`].
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        KyupiError::StorageUnavailable {
            source: source.into(),
        }
    }

    /// Returns true for errors caused by the request itself rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            KyupiError::InvalidPair
                | KyupiError::InvalidSelfAction
                | KyupiError::DecisionAlreadyExists
                | KyupiError::NoActiveMatch
                | KyupiError::NotAMatchMember
                | KyupiError::InvalidInput(_)
        )
    }
}
