// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth token refresh.

use crate::credential::oauth::{token_error, TokenResponse};
use crate::credential::pkce::ClientAuth;

/// Perform a single token refresh request. Callers decide whether to retry.
pub async fn do_refresh(
    client: &reqwest::Client,
    token_url: &str,
    auth: &ClientAuth<'_>,
    refresh_token: &str,
) -> anyhow::Result<TokenResponse> {
    let resp = client
        .post(token_url)
        .basic_auth(auth.client_id, Some(auth.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("client_id", auth.client_id),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(token_error("refresh", resp).await);
    }

    let token: TokenResponse = resp.json().await?;
    Ok(token)
}
