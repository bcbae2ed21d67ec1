// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the JSON API.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credential::{ClientError, TokenBundle};
use crate::error::ErrorCode;
use crate::state::AppState;

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub pending_auths: usize,
}

#[derive(Debug, Serialize)]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// Query parameters the identity provider appends to the callback.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    #[serde(default, rename = "accessToken")]
    pub access_token: Option<String>,
    /// JSON-encoded [`TokenBundle`].
    #[serde(default, rename = "tokenData")]
    pub token_data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: Value,
    /// Replacement bundle when the supplied one was refreshed. The old
    /// refresh token is spent at that point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenBundle>,
}

impl UserQuery {
    /// Resolve the supplied token. `tokenData` wins when both are present.
    pub fn into_bundle(self) -> Result<TokenBundle, &'static str> {
        let bundle = match (self.token_data, self.access_token) {
            (Some(data), _) => serde_json::from_str::<TokenBundle>(&data)
                .map_err(|_| "tokenData is not a valid token bundle")?,
            (None, Some(token)) => TokenBundle::from_access_token(token),
            (None, None) => return Err("missing access token"),
        };
        if bundle.has_access_token() {
            Ok(bundle)
        } else {
            Err("missing access token")
        }
    }
}

// -- Handlers -----------------------------------------------------------------

/// `GET /api/health`
pub async fn health(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "running".to_owned(),
        pending_auths: s.factory.pending_count().await,
    })
}

/// `GET /api/auth/url`: start an authorization attempt.
pub async fn auth_url(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    let req = s.factory.begin_authorization().await;
    Json(AuthUrlResponse { auth_url: req.url })
}

/// `GET /api/auth?code=&state=`: exchange the authorization code.
pub async fn auth(
    State(s): State<Arc<AppState>>,
    Query(q): Query<CallbackQuery>,
) -> impl IntoResponse {
    let (Some(code), Some(state)) =
        (q.code.filter(|c| !c.is_empty()), q.state.filter(|st| !st.is_empty()))
    else {
        tracing::warn!("token exchange called without code or state");
        return ErrorCode::BadRequest
            .to_http_response("missing or invalid parameters")
            .into_response();
    };

    match s.factory.exchange_code(&state, &code).await {
        Ok(bundle) => Json(bundle).into_response(),
        Err(e) => client_error_response(e, "failed to fetch access token"),
    }
}

/// `GET /api/user?accessToken=` or `GET /api/user?tokenData=`: fetch the
/// authenticated user's profile.
pub async fn user(State(s): State<Arc<AppState>>, Query(q): Query<UserQuery>) -> impl IntoResponse {
    let bundle = match q.into_bundle() {
        Ok(b) => b,
        Err(msg) => {
            tracing::warn!("{msg}");
            return ErrorCode::BadRequest.to_http_response(msg).into_response();
        }
    };

    match s.factory.fetch_current_user(bundle).await {
        Ok(current) => {
            Json(UserResponse { user: current.user, token: current.refreshed }).into_response()
        }
        Err(e) => client_error_response(e, "failed to fetch user data"),
    }
}

/// `GET /api/users/{username}`: public lookup with the app-only credential.
pub async fn user_by_username(
    State(s): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    if !is_valid_username(&username) {
        return ErrorCode::BadRequest.to_http_response("invalid username").into_response();
    }

    match s.factory.lookup_user(&username).await {
        Ok(user) => Json(UserResponse { user, token: None }).into_response(),
        Err(e) => client_error_response(e, "failed to look up user"),
    }
}

/// X usernames: 1-15 ASCII letters, digits, or underscores.
pub fn is_valid_username(name: &str) -> bool {
    (1..=15).contains(&name.len()) && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Log the full error server-side and answer with a fixed message.
fn client_error_response(err: ClientError, upstream_message: &str) -> Response {
    let code = err.code();
    let message = match &err {
        ClientError::UnknownState => "missing or invalid parameters",
        ClientError::MissingToken => "missing access token",
        ClientError::RefreshFailed(_) => "failed to refresh access token",
        ClientError::Upstream(_) => upstream_message,
    };
    match code {
        ErrorCode::BadRequest => {
            tracing::warn!(err = %err, "{message}");
        }
        ErrorCode::UpstreamError | ErrorCode::Internal => {
            tracing::error!(err = %err, "{message}");
        }
    }
    code.to_http_response(message).into_response()
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
