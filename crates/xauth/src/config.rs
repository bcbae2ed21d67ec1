// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use clap::Parser;

/// OAuth 2.0 authorization-code demo server for the X API.
#[derive(Debug, Clone, Parser)]
#[command(name = "xauth", version, about)]
pub struct Config {
    /// OAuth client ID issued by the developer portal.
    #[arg(long, env = "CLIENT_ID")]
    pub client_id: String,

    /// OAuth client secret (confidential client).
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// Redirect URI registered for the app; should point at `/onboarding`.
    #[arg(long, env = "CALLBACK_URL")]
    pub callback_url: String,

    /// App-only bearer token for public lookups.
    #[arg(long, env = "BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: String,

    /// Space-separated scopes requested during authorization.
    #[arg(long, env = "XAUTH_SCOPES", default_value = "tweet.read users.read offline.access")]
    pub scopes: String,

    /// Authorization endpoint the browser is redirected to.
    #[arg(long, env = "XAUTH_AUTHORIZE_URL", default_value = "https://twitter.com/i/oauth2/authorize")]
    pub authorize_url: String,

    /// Token endpoint used for code exchange and refresh.
    #[arg(long, env = "XAUTH_TOKEN_URL", default_value = "https://api.twitter.com/2/oauth2/token")]
    pub token_url: String,

    /// Base URL of the resource server.
    #[arg(long, env = "XAUTH_API_BASE_URL", default_value = "https://api.twitter.com")]
    pub api_base_url: String,

    /// Host address to bind to.
    #[arg(long, env = "XAUTH_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// HTTP port to listen on.
    #[arg(long, env = "XAUTH_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Timeout for each outbound request in milliseconds.
    #[arg(long, env = "XAUTH_HTTP_TIMEOUT_MS", default_value_t = 10_000)]
    pub http_timeout_ms: u64,

    /// How long a started authorization attempt stays valid, in seconds.
    #[arg(long, env = "XAUTH_PENDING_TTL_SECS", default_value_t = 600)]
    pub pending_ttl_secs: u64,

    /// Log format (json or text).
    #[arg(long, env = "XAUTH_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "XAUTH_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Validate values clap cannot check on its own.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("--client-id", &self.client_id),
            ("--client-secret", &self.client_secret),
            ("--callback-url", &self.callback_url),
            ("--bearer-token", &self.bearer_token),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{name} must not be empty");
            }
        }

        for (name, value) in [
            ("--callback-url", &self.callback_url),
            ("--authorize-url", &self.authorize_url),
            ("--token-url", &self.token_url),
            ("--api-base-url", &self.api_base_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                anyhow::bail!("{name} must be an http(s) URL, got {value:?}");
            }
        }

        if self.scopes.split_whitespace().next().is_none() {
            anyhow::bail!("--scopes must name at least one scope");
        }
        if self.http_timeout_ms == 0 {
            anyhow::bail!("--http-timeout-ms must be greater than zero");
        }
        if self.pending_ttl_secs == 0 {
            anyhow::bail!("--pending-ttl-secs must be greater than zero");
        }
        match self.log_format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("invalid log format: {other}"),
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn pending_ttl(&self) -> Duration {
        Duration::from_secs(self.pending_ttl_secs)
    }

    /// Base URL of the resource server without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
