// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use kyupi_core::types::{
    Decision, DecisionOutcome, Match, MatchId, MatchSummary, Message, Preference, UserId,
};
use kyupi_core::{HealthStatus, KyupiError, PluginAdapter};

use crate::auth::AuthenticatedUser;
use crate::server::AppState;

/// Request body for POST /v1/likes.
#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub target_user_id: UserId,
    /// Defaults to `like`.
    #[serde(default)]
    pub status: Option<Decision>,
}

/// Request body for POST /v1/passes and POST /v1/matches/reconcile.
#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub target_user_id: UserId,
}

/// Response body for POST /v1/passes.
#[derive(Debug, Serialize)]
pub struct PassResponse {
    pub pass: Preference,
}

/// Response body for POST /v1/matches/reconcile.
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub matched: bool,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_record: Option<Match>,
}

/// Request body for POST /v1/messages.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub match_id: Option<MatchId>,
    pub receiver_id: UserId,
    pub content: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub storage: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A [`KyupiError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub KyupiError);

impl From<KyupiError> for ApiError {
    fn from(err: KyupiError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(KyupiError::InvalidInput(rejection.body_text()))
    }
}

/// Status code for each error kind.
pub fn status_for(err: &KyupiError) -> StatusCode {
    match err {
        KyupiError::InvalidPair | KyupiError::InvalidSelfAction | KyupiError::InvalidInput(_) => {
            StatusCode::BAD_REQUEST
        }
        KyupiError::DecisionAlreadyExists => StatusCode::CONFLICT,
        KyupiError::NoActiveMatch | KyupiError::NotAMatchMember => StatusCode::FORBIDDEN,
        KyupiError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        KyupiError::Config(_) | KyupiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        // Server-side failures are logged in full and reported generically.
        let error = if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
            match self.0 {
                KyupiError::StorageUnavailable { .. } => "storage unavailable".to_string(),
                _ => "internal error".to_string(),
            }
        } else {
            self.0.to_string()
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// GET /health (unauthenticated)
pub async fn get_health(State(state): State<AppState>) -> Response {
    let (status, storage) = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "healthy".to_string()),
        Ok(HealthStatus::Degraded(reason)) => (StatusCode::OK, format!("degraded: {reason}")),
        Ok(HealthStatus::Unhealthy(reason)) => {
            (StatusCode::SERVICE_UNAVAILABLE, format!("unhealthy: {reason}"))
        }
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, format!("unhealthy: {e}")),
    };
    let body = HealthResponse {
        status: if status == StatusCode::OK { "ok" } else { "unavailable" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        storage,
    };
    (status, Json(body)).into_response()
}

/// POST /v1/likes
pub async fn post_like(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(actor)): Extension<AuthenticatedUser>,
    body: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DecisionOutcome>), ApiError> {
    let Json(body) = body?;
    let decision = body.status.unwrap_or(Decision::Like);
    let outcome = state
        .engine
        .record_decision(&actor, &body.target_user_id, decision)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// POST /v1/passes
pub async fn post_pass(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(actor)): Extension<AuthenticatedUser>,
    body: Result<Json<TargetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PassResponse>), ApiError> {
    let Json(body) = body?;
    let outcome = state
        .engine
        .record_decision(&actor, &body.target_user_id, Decision::Pass)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PassResponse {
            pass: outcome.preference,
        }),
    ))
}

/// GET /v1/matches
pub async fn get_matches(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<MatchSummary>>, ApiError> {
    Ok(Json(state.engine.list_matches(&user).await?))
}

/// POST /v1/matches/reconcile
pub async fn post_reconcile(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(actor)): Extension<AuthenticatedUser>,
    body: Result<Json<TargetRequest>, JsonRejection>,
) -> Result<Json<ReconcileResponse>, ApiError> {
    let Json(body) = body?;
    let match_record = state.engine.reconcile(&actor, &body.target_user_id).await?;
    Ok(Json(ReconcileResponse {
        matched: match_record.is_some(),
        match_record,
    }))
}

/// POST /v1/messages
pub async fn post_message(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(sender)): Extension<AuthenticatedUser>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let Json(body) = body?;
    let message = state
        .chat
        .send_message(&sender, &body.receiver_id, body.match_id, &body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /v1/matches/{match_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(requester)): Extension<AuthenticatedUser>,
    Path(match_id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let match_id: MatchId = match_id.parse()?;
    Ok(Json(state.chat.read_messages(&requester, &match_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_every_kind() {
        let cases = [
            (KyupiError::InvalidPair, StatusCode::BAD_REQUEST),
            (KyupiError::InvalidSelfAction, StatusCode::BAD_REQUEST),
            (KyupiError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (KyupiError::DecisionAlreadyExists, StatusCode::CONFLICT),
            (KyupiError::NoActiveMatch, StatusCode::FORBIDDEN),
            (KyupiError::NotAMatchMember, StatusCode::FORBIDDEN),
            (
                KyupiError::storage("disk"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (KyupiError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (KyupiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(status_for(&err), expected, "{err:?}");
        }
    }

    #[test]
    fn like_request_defaults_to_like() {
        let body: LikeRequest = serde_json::from_str(
            r#"{"target_user_id":"6f1c1d5e-8a4b-4c1e-9f3a-2b7d9e0a1c55"}"#,
        )
        .unwrap();
        assert!(body.status.is_none());

        let body: LikeRequest = serde_json::from_str(
            r#"{"target_user_id":"6f1c1d5e-8a4b-4c1e-9f3a-2b7d9e0a1c55","status":"pass"}"#,
        )
        .unwrap();
        assert_eq!(body.status, Some(Decision::Pass));
    }

    #[test]
    fn send_request_match_id_is_optional() {
        let body: SendMessageRequest = serde_json::from_str(
            r#"{"receiver_id":"6f1c1d5e-8a4b-4c1e-9f3a-2b7d9e0a1c55","content":"hi"}"#,
        )
        .unwrap();
        assert!(body.match_id.is_none());
    }

    #[test]
    fn error_response_serializes() {
        let json = serde_json::to_string(&ErrorResponse {
            error: "nope".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"error":"nope"}"#);
    }
}
