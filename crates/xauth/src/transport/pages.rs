// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-rendered pages.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, Redirect};

use crate::onboarding::{self, render};
use crate::state::AppState;
use crate::transport::http::CallbackQuery;

/// Path of the sign-in redirect linked from the home page.
pub const LOGIN_PATH: &str = "/login";

/// `GET /`: sign-in page. Rendering it starts no authorization attempt.
pub async fn home() -> Html<String> {
    Html(render::render_home(LOGIN_PATH))
}

/// `GET /login`: start an attempt and send the browser to the identity provider.
pub async fn login(State(s): State<Arc<AppState>>) -> Redirect {
    let req = s.factory.begin_authorization().await;
    Redirect::to(&req.url)
}

/// `GET /onboarding?code=&state=`: callback target of the identity provider.
pub async fn onboarding(
    State(s): State<Arc<AppState>>,
    Query(q): Query<CallbackQuery>,
) -> Html<String> {
    let flow = onboarding::drive(&s.factory, q.code.as_deref(), q.state.as_deref()).await;
    tracing::info!(phase = flow.phase().as_str(), failed = flow.is_failed(), "onboarding finished");
    Html(render::render_onboarding(&flow))
}
