// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport: JSON API plus the two server-rendered pages.

pub mod http;
pub mod pages;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the axum `Router` with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(pages::home))
        .route(pages::LOGIN_PATH, get(pages::login))
        .route("/onboarding", get(pages::onboarding))
        // API
        .route("/api/health", get(http::health))
        .route("/api/auth/url", get(http::auth_url))
        .route("/api/auth", get(http::auth))
        .route("/api/user", get(http::user))
        .route("/api/users/{username}", get(http::user_by_username))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
