// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth authorization code + PKCE (RFC 7636) helpers.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::credential::oauth::{token_error, TokenResponse};

/// 32 random bytes, base64url without padding (43 chars).
fn random_urlsafe() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Fresh PKCE code verifier. 43 chars sits inside RFC 7636's 43-128 range.
pub fn generate_code_verifier() -> String {
    random_urlsafe()
}

/// Compute code_challenge = base64url_nopad(sha256(verifier)).
pub fn compute_code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Fresh opaque `state` value binding a callback to its attempt.
pub fn generate_state() -> String {
    random_urlsafe()
}

/// Build the full authorization URL with PKCE parameters.
pub fn build_auth_url(
    authorize_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    code_challenge: &str,
    state: &str,
) -> String {
    format!(
        "{authorize_url}?response_type=code\
         &client_id={client_id}\
         &redirect_uri={redirect_uri}\
         &scope={scope}\
         &state={state}\
         &code_challenge={code_challenge}\
         &code_challenge_method=S256",
        client_id = urlencoding(client_id),
        redirect_uri = urlencoding(redirect_uri),
        scope = urlencoding(scope),
        state = urlencoding(state),
        code_challenge = urlencoding(code_challenge),
    )
}

/// Client identity used against the token endpoint.
///
/// Confidential clients authenticate with HTTP Basic; `client_id` is also
/// sent in the form body as the X token endpoint expects.
pub struct ClientAuth<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Exchange an authorization code for tokens.
pub async fn exchange_code(
    client: &reqwest::Client,
    token_url: &str,
    auth: &ClientAuth<'_>,
    code: &str,
    code_verifier: &str,
    redirect_uri: &str,
) -> anyhow::Result<TokenResponse> {
    let resp = client
        .post(token_url)
        .basic_auth(auth.client_id, Some(auth.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", auth.client_id),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("code_verifier", code_verifier),
        ])
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(token_error("token exchange", resp).await);
    }

    let token: TokenResponse = resp.json().await?;
    Ok(token)
}

/// Form-style encoding for URL query parameters (spaces as `+`).
pub(crate) fn urlencoding(s: &str) -> String {
    s.bytes().fold(String::with_capacity(s.len()), |mut out, b| {
        match b {
            b if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') => {
                out.push(char::from(b));
            }
            b' ' => out.push('+'),
            b => out.push_str(&format!("%{b:02X}")),
        }
        out
    })
}

#[cfg(test)]
#[path = "pkce_tests.rs"]
mod tests;
