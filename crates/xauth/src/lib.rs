// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! xauth: OAuth 2.0 authorization code + PKCE demo server for the X API.

pub mod config;
pub mod credential;
pub mod error;
pub mod onboarding;
pub mod state;
pub mod transport;
pub mod upstream;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::state::AppState;
use crate::transport::build_router;

/// Run the server until shutdown.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = config.addr();
    let shutdown = CancellationToken::new();

    let state = Arc::new(AppState::new(&config, shutdown.clone())?);
    spawn_signal_handler(shutdown.clone());

    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("xauth listening on {addr}");
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    tracing::info!("xauth stopped");
    Ok(())
}

/// Cancel `shutdown` on SIGTERM or SIGINT.
fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()).ok();
        let mut sigint =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()).ok();

        tokio::select! {
            _ = async {
                if let Some(ref mut s) = sigterm { s.recv().await } else { std::future::pending().await }
            } => {
                tracing::info!("received SIGTERM");
            }
            _ = async {
                if let Some(ref mut s) = sigint { s.recv().await } else { std::future::pending().await }
            } => {
                tracing::info!("received SIGINT");
            }
            _ = shutdown.cancelled() => return,
        }
        shutdown.cancel();
    });
}
