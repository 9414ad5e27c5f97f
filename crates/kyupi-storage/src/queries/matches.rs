// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Match operations keyed by the canonical pair.
//!
//! Callers pass a [`CanonicalPair`]; these functions never reorder identities.

use kyupi_core::types::{MatchId, UserId};
use kyupi_core::{CanonicalPair, KyupiError};
use rusqlite::{OptionalExtension, TransactionBehavior, params};

use crate::database::{Database, is_unique_violation};
use crate::models::{MATCH_COLUMNS, Match, match_from_row};

/// Whether a match row exists for the pair.
pub async fn exists(db: &Database, pair: &CanonicalPair) -> Result<bool, KyupiError> {
    let (low, high) = pair.key();
    db.call(move |conn| {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM matches WHERE user_low = ?1 AND user_high = ?2)",
            params![low, high],
            |row| row.get(0),
        )
    })
    .await
}

/// Insert a match for the pair, or return the stored one.
///
/// The UNIQUE(user_low, user_high) violation is the signal that another
/// caller got there first; the existing row is then read back in the same
/// transaction. Returns `(match, created)`.
pub async fn create_if_absent(
    db: &Database,
    pair: &CanonicalPair,
) -> Result<(Match, bool), KyupiError> {
    let candidate = Match::new(*pair);
    db.call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let insert = tx.execute(
            "INSERT INTO matches (id, user_low, user_high, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                candidate.id.to_string(),
                candidate.user_low.to_string(),
                candidate.user_high.to_string(),
                candidate.created_at,
                candidate.updated_at,
            ],
        );
        let outcome = match insert {
            Ok(_) => (candidate, true),
            Err(e) if is_unique_violation(&e) => {
                let existing = tx.query_row(
                    &format!(
                        "SELECT {MATCH_COLUMNS} FROM matches WHERE user_low = ?1 AND user_high = ?2"
                    ),
                    params![
                        candidate.user_low.to_string(),
                        candidate.user_high.to_string()
                    ],
                    match_from_row,
                )?;
                (existing, false)
            }
            Err(e) => return Err(e),
        };
        tx.commit()?;
        Ok(outcome)
    })
    .await
}

/// Fetch the match for the pair.
pub async fn get_for_pair(
    db: &Database,
    pair: &CanonicalPair,
) -> Result<Option<Match>, KyupiError> {
    let (low, high) = pair.key();
    db.call(move |conn| {
        conn.query_row(
            &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE user_low = ?1 AND user_high = ?2"),
            params![low, high],
            match_from_row,
        )
        .optional()
    })
    .await
}

/// Fetch a match by id.
pub async fn get_by_id(db: &Database, id: &MatchId) -> Result<Option<Match>, KyupiError> {
    let id = id.to_string();
    db.call(move |conn| {
        conn.query_row(
            &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1"),
            params![id],
            match_from_row,
        )
        .optional()
    })
    .await
}

/// Matches in which `user` is either member, newest first.
pub async fn list_for_identity(db: &Database, user: &UserId) -> Result<Vec<Match>, KyupiError> {
    let user = user.to_string();
    db.call(move |conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches
             WHERE user_low = ?1 OR user_high = ?1
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map(params![user], match_from_row)?;
        let mut matches = Vec::new();
        for row in rows {
            matches.push(row?);
        }
        Ok(matches)
    })
    .await
}
