// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth helper types and utilities.

use serde::{Deserialize, Serialize};

use crate::credential::TokenBundle;

/// Standard OAuth2 token response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Convert to a bundle with an absolute expiry relative to `now`.
    ///
    /// A refresh response may omit `refresh_token`; `previous_refresh` is kept
    /// in that case.
    pub fn into_bundle(self, now: u64, previous_refresh: Option<String>) -> TokenBundle {
        let expires_at = if self.expires_in == 0 { 0 } else { now + self.expires_in };
        TokenBundle {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_owned()),
            scope: self.scope.unwrap_or_default(),
            refresh_token: self.refresh_token.or(previous_refresh),
            expires_at,
        }
    }
}

/// Return current epoch seconds.
pub fn epoch_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Read a failed token-endpoint response into an error.
pub(crate) async fn token_error(what: &str, resp: reqwest::Response) -> anyhow::Error {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    anyhow::anyhow!("{what} failed ({status}): {text}")
}
