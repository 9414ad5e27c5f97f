// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity middleware.
//!
//! The gateway sits behind an authenticator that forwards the caller's user
//! id in a configurable header. When a bearer token is configured the
//! upstream must also present it, so requests that bypass the authenticator
//! are refused. A missing or malformed identity is a 401.

use axum::{
    extract::{Request, State},
    http::{HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use kyupi_config::model::GatewayConfig;
use kyupi_core::{KyupiError, UserId};

use crate::handlers::ErrorResponse;

/// Authentication settings derived from [`GatewayConfig`].
#[derive(Clone)]
pub struct AuthConfig {
    pub identity_header: HeaderName,
    /// Expected bearer token. `None` disables the check.
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("identity_header", &self.identity_header)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

impl AuthConfig {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, KyupiError> {
        let identity_header = HeaderName::from_bytes(config.identity_header.as_bytes())
            .map_err(|e| {
                KyupiError::Config(format!(
                    "invalid gateway.identity_header `{}`: {e}",
                    config.identity_header
                ))
            })?;
        if config.bearer_token.is_none() {
            tracing::warn!(
                header = %identity_header,
                "gateway.bearer_token is not set; identity headers are trusted from any caller"
            );
        }
        Ok(Self {
            identity_header,
            bearer_token: config.bearer_token.clone(),
        })
    }
}

/// The caller's identity, inserted into request extensions by [`identity_middleware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

fn unauthorized(reason: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: reason.to_string(),
        }),
    )
        .into_response()
}

/// Require the bearer token (if configured) and a well-formed identity header.
pub async fn identity_middleware(
    State(auth): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = &auth.bearer_token {
        let presented = request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if presented != Some(expected.as_str()) {
            tracing::debug!("rejected request: bearer token missing or wrong");
            return unauthorized("unauthorized");
        }
    }

    let user = request
        .headers()
        .get(&auth.identity_header)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<UserId>().ok());

    match user {
        Some(user) => {
            request.extensions_mut().insert(AuthenticatedUser(user));
            next.run(request).await
        }
        None => {
            tracing::debug!(header = %auth.identity_header, "rejected request: missing or malformed identity");
            unauthorized("missing or invalid user identity")
        }
    }
}
