// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Preference (like/pass) operations.

use kyupi_core::types::{Decision, UserId};
use kyupi_core::KyupiError;
use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::database::{Database, is_unique_violation};
use crate::models::{PREFERENCE_COLUMNS, Preference, preference_from_row};

/// Insert a preference.
///
/// An existing row for the same `(actor, target)` yields
/// [`KyupiError::DecisionAlreadyExists`] and leaves it untouched.
pub async fn insert_preference(db: &Database, pref: &Preference) -> Result<(), KyupiError> {
    if pref.actor_id == pref.target_id {
        return Err(KyupiError::InvalidSelfAction);
    }

    let pref = pref.clone();
    let inserted = db
        .call(move |conn| {
            let result = conn.execute(
                "INSERT INTO preferences (id, actor_id, target_id, decision, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    pref.id.to_string(),
                    pref.actor_id.to_string(),
                    pref.target_id.to_string(),
                    pref.decision.as_ref(),
                    pref.created_at,
                    pref.updated_at,
                ],
            );
            match result {
                Ok(_) => Ok(true),
                Err(e) if is_unique_violation(&e) => Ok(false),
                Err(e) => Err(e),
            }
        })
        .await?;

    if inserted {
        debug!("preference stored");
        Ok(())
    } else {
        Err(KyupiError::DecisionAlreadyExists)
    }
}

/// Fetch the preference `actor` recorded toward `target`.
pub async fn get_preference(
    db: &Database,
    actor: &UserId,
    target: &UserId,
) -> Result<Option<Preference>, KyupiError> {
    let (actor, target) = (actor.to_string(), target.to_string());
    db.call(move |conn| {
        conn.query_row(
            &format!(
                "SELECT {PREFERENCE_COLUMNS} FROM preferences WHERE actor_id = ?1 AND target_id = ?2"
            ),
            params![actor, target],
            preference_from_row,
        )
        .optional()
    })
    .await
}

/// Whether `actor` has a `like` recorded toward `target`.
pub async fn has_liked(db: &Database, actor: &UserId, target: &UserId) -> Result<bool, KyupiError> {
    let (actor, target) = (actor.to_string(), target.to_string());
    db.call(move |conn| {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM preferences
                           WHERE actor_id = ?1 AND target_id = ?2 AND decision = ?3)",
            params![actor, target, Decision::Like.as_ref()],
            |row| row.get(0),
        )
    })
    .await
}
