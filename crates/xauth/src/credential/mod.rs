// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credentials for the X API.
//!
//! Two kinds exist: a user-delegated credential obtained through the
//! authorization code + PKCE flow, and an app-only bearer credential read from
//! configuration. [`factory::ClientFactory`] owns both and hands out API
//! clients bound to either.

pub mod factory;
pub mod oauth;
pub mod pkce;
pub mod refresh;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Access/refresh token record produced by the code exchange.
///
/// Passed by value between the exchange and user endpoints. Fields default
/// when absent so a bundle missing `access_token` can be rejected by
/// [`TokenBundle::has_access_token`] instead of a parse error.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Expiry as epoch seconds; 0 means no known expiry.
    #[serde(default)]
    pub expires_at: u64,
}

impl TokenBundle {
    /// Bundle carrying only a bare access token.
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_owned(),
            ..Self::default()
        }
    }

    pub fn has_access_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at != 0 && self.expires_at <= now
    }
}

impl fmt::Debug for TokenBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBundle")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// OAuth client registration used for the user-delegated flow.
///
/// Immutable after startup. Tokens obtained through it belong to the caller
/// and are never stored here.
#[derive(Clone)]
pub struct UserCredential {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    pub scopes: Vec<String>,
}

impl UserCredential {
    /// Scopes joined for the `scope` authorization parameter.
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("client_id", &self.client_id)
            .field("callback_url", &self.callback_url)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

/// App-only credential holding a static bearer token.
#[derive(Clone)]
pub struct AppCredential {
    pub bearer_token: String,
}

impl fmt::Debug for AppCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredential").field("bearer_token", &"<redacted>").finish()
    }
}

/// Either credential kind an API client can be bound to.
#[derive(Debug, Clone)]
pub enum Credential {
    /// A user's token bundle, already refreshed if it had expired.
    User(TokenBundle),
    App(AppCredential),
}

impl Credential {
    /// Token sent as `Authorization: Bearer`, if one is available.
    pub fn bearer(&self) -> Option<&str> {
        match self {
            Self::User(token) => {
                Some(token.access_token.as_str()).filter(|_| token.has_access_token())
            }
            Self::App(app) => Some(app.bearer_token.as_str()).filter(|t| !t.is_empty()),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

/// Failures from the client factory and API clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("unknown or expired authorization state")]
    UnknownState,
    #[error("no access token available")]
    MissingToken,
    #[error("token refresh failed: {0:#}")]
    RefreshFailed(anyhow::Error),
    #[error("upstream request failed: {0:#}")]
    Upstream(#[from] anyhow::Error),
}

impl ClientError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownState | Self::MissingToken => ErrorCode::BadRequest,
            Self::RefreshFailed(_) | Self::Upstream(_) => ErrorCode::UpstreamError,
        }
    }
}
