// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the X API resource server.

use reqwest::Client;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::credential::Credential;

/// Profile fields requested alongside the default `id`, `name`, `username`.
pub const USER_FIELDS: &str =
    "created_at,description,location,profile_image_url,public_metrics,url,verified";

/// API client bound to one credential.
///
/// Cheap to construct; the underlying connection pool is shared.
pub struct ApiClient {
    base_url: String,
    credential: Credential,
    client: Client,
    shutdown: CancellationToken,
}

impl ApiClient {
    pub fn new(
        base_url: String,
        credential: Credential,
        client: Client,
        shutdown: CancellationToken,
    ) -> Self {
        Self { base_url, credential, client, shutdown }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the authenticated user (`GET /2/users/me`).
    pub async fn find_my_user(&self) -> anyhow::Result<Value> {
        if !self.credential.is_user() {
            anyhow::bail!("users/me requires a user-context credential");
        }
        self.get_data(&format!("/2/users/me?user.fields={USER_FIELDS}")).await
    }

    /// Look up a public profile by username (`GET /2/users/by/username/:username`).
    pub async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Value> {
        self.get_data(&format!("/2/users/by/username/{username}?user.fields={USER_FIELDS}")).await
    }

    /// GET a v2 endpoint and return its `data` member unchanged.
    async fn get_data(&self, path: &str) -> anyhow::Result<Value> {
        let token = self
            .credential
            .bearer()
            .ok_or_else(|| anyhow::anyhow!("credential has no access token"))?;
        let req = self.client.get(self.url(path)).bearer_auth(token);

        let resp = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => anyhow::bail!("request cancelled by shutdown"),
            resp = req.send() => resp?,
        };
        let mut body: Value = resp.error_for_status()?.json().await?;
        let data = body.get_mut("data").map(Value::take);
        match data {
            Some(data) if data.is_object() => Ok(data),
            _ => anyhow::bail!("response has no data object: {body}"),
        }
    }
}
