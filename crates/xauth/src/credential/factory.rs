// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client factory: owns the credentials, in-flight authorization attempts,
//! and the shared HTTP connection pool.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::credential::oauth::epoch_secs;
use crate::credential::pkce::{self, ClientAuth};
use crate::credential::refresh::do_refresh;
use crate::credential::{AppCredential, ClientError, Credential, TokenBundle, UserCredential};
use crate::upstream::client::ApiClient;

/// Upper bound on concurrently pending authorization attempts.
const MAX_PENDING: usize = 1024;

/// In-flight authorization code + PKCE attempt.
struct PendingAuth {
    code_verifier: String,
    created_at: Instant,
}

/// A freshly started authorization attempt.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// Outcome of binding a caller's bundle: the usable token, and whether it
/// had to be refreshed first.
#[derive(Debug, Clone)]
pub struct Rehydrated {
    pub token: TokenBundle,
    pub refreshed: bool,
}

/// Profile of the token's owner, plus the replacement bundle when the
/// supplied one was refreshed on the way.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: Value,
    pub refreshed: Option<TokenBundle>,
}

/// Builds credentials and API clients for request handlers.
///
/// One instance lives in the application state and is shared by reference.
/// It holds client configuration and in-flight authorization attempts only;
/// user tokens travel with each request.
pub struct ClientFactory {
    user: UserCredential,
    app: AppCredential,
    authorize_url: String,
    token_url: String,
    api_base_url: String,
    pending_ttl: Duration,
    /// Pending attempts keyed by `state`.
    pending: RwLock<HashMap<String, PendingAuth>>,
    http: reqwest::Client,
    shutdown: CancellationToken,
}

impl ClientFactory {
    pub fn new(config: &Config, shutdown: CancellationToken) -> anyhow::Result<Arc<Self>> {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let http = reqwest::Client::builder().timeout(config.http_timeout()).build()?;

        let user = UserCredential {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            callback_url: config.callback_url.clone(),
            scopes: config.scopes.split_whitespace().map(str::to_owned).collect(),
        };

        Ok(Arc::new(Self {
            user,
            app: AppCredential { bearer_token: config.bearer_token.clone() },
            authorize_url: config.authorize_url.clone(),
            token_url: config.token_url.clone(),
            api_base_url: config.api_base().to_owned(),
            pending_ttl: config.pending_ttl(),
            pending: RwLock::new(HashMap::new()),
            http,
            shutdown,
        }))
    }

    pub fn user_credential(&self) -> &UserCredential {
        &self.user
    }

    /// Make a caller-supplied bundle usable, refreshing it first if it expired.
    ///
    /// A refresh rotates the refresh token, so callers must hand the returned
    /// bundle back to whoever owns the token.
    pub async fn rehydrate(&self, bundle: TokenBundle) -> Result<Rehydrated, ClientError> {
        if !bundle.has_access_token() {
            return Err(ClientError::MissingToken);
        }
        if !bundle.is_expired(epoch_secs()) {
            return Ok(Rehydrated { token: bundle, refreshed: false });
        }

        let token = self.refresh_bundle(&bundle).await?;
        Ok(Rehydrated { token, refreshed: true })
    }

    pub fn app_credential(&self) -> AppCredential {
        self.app.clone()
    }

    /// Build an API client bound to `credential`.
    pub fn api_client(&self, credential: Credential) -> ApiClient {
        ApiClient::new(
            self.api_base_url.clone(),
            credential,
            self.http.clone(),
            self.shutdown.clone(),
        )
    }

    /// Start an authorization attempt with a fresh verifier and state.
    pub async fn begin_authorization(&self) -> AuthorizationRequest {
        let code_verifier = pkce::generate_code_verifier();
        let code_challenge = pkce::compute_code_challenge(&code_verifier);
        let state = pkce::generate_state();
        let user = self.user_credential();
        let url = pkce::build_auth_url(
            &self.authorize_url,
            &user.client_id,
            &user.callback_url,
            &user.scope_param(),
            &code_challenge,
            &state,
        );

        let mut pending = self.pending.write().await;
        let ttl = self.pending_ttl;
        pending.retain(|_, p| p.created_at.elapsed() < ttl);
        if pending.len() >= MAX_PENDING {
            let oldest = pending.iter().min_by_key(|(_, p)| p.created_at).map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                pending.remove(&oldest);
                tracing::warn!("pending authorization limit reached, evicted oldest attempt");
            }
        }
        pending.insert(state.clone(), PendingAuth { code_verifier, created_at: Instant::now() });
        tracing::debug!(pending = pending.len(), "authorization attempt started");

        AuthorizationRequest { url, state }
    }

    /// Number of live authorization attempts.
    pub async fn pending_count(&self) -> usize {
        let ttl = self.pending_ttl;
        self.pending.read().await.values().filter(|p| p.created_at.elapsed() < ttl).count()
    }

    /// Exchange `code` for a token bundle using the attempt started under `state`.
    ///
    /// The attempt is consumed whether or not the exchange succeeds.
    pub async fn exchange_code(&self, state: &str, code: &str) -> Result<TokenBundle, ClientError> {
        let pending = self.pending.write().await.remove(state);
        let pending = match pending {
            Some(p) if p.created_at.elapsed() < self.pending_ttl => p,
            _ => return Err(ClientError::UnknownState),
        };

        let token = self
            .cancellable(pkce::exchange_code(
                &self.http,
                &self.token_url,
                &self.client_auth(),
                code,
                &pending.code_verifier,
                &self.user.callback_url,
            ))
            .await?;

        let bundle = token.into_bundle(epoch_secs(), None);
        tracing::info!(scope = %bundle.scope, expires_at = bundle.expires_at, "authorization code exchanged");
        Ok(bundle)
    }

    /// Fetch the profile of the user owning `bundle`.
    pub async fn fetch_current_user(&self, bundle: TokenBundle) -> Result<CurrentUser, ClientError> {
        let Rehydrated { token, refreshed } = self.rehydrate(bundle).await?;
        let refreshed = refreshed.then(|| token.clone());
        let client = self.api_client(Credential::User(token));
        let user = client.find_my_user().await?;
        Ok(CurrentUser { user, refreshed })
    }

    /// Look up a public profile with the app-only credential.
    pub async fn lookup_user(&self, username: &str) -> Result<Value, ClientError> {
        let client = self.api_client(Credential::App(self.app_credential()));
        Ok(client.find_user_by_username(username).await?)
    }

    fn client_auth(&self) -> ClientAuth<'_> {
        ClientAuth { client_id: &self.user.client_id, client_secret: &self.user.client_secret }
    }

    async fn refresh_bundle(&self, bundle: &TokenBundle) -> Result<TokenBundle, ClientError> {
        let Some(refresh_token) = bundle.refresh_token.as_deref() else {
            return Err(ClientError::RefreshFailed(anyhow::anyhow!(
                "token expired and no refresh token is available"
            )));
        };

        let token = self
            .cancellable(do_refresh(&self.http, &self.token_url, &self.client_auth(), refresh_token))
            .await
            .map_err(ClientError::RefreshFailed)?;

        tracing::info!("access token refreshed");
        Ok(token.into_bundle(epoch_secs(), bundle.refresh_token.clone()))
    }

    /// Run an outbound call, abandoning it on shutdown.
    async fn cancellable<T>(
        &self,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> anyhow::Result<T> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => anyhow::bail!("request cancelled by shutdown"),
            result = fut => result,
        }
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
