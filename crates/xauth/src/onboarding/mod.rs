// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Onboarding flow: runs the code exchange and the profile fetch in sequence
//! after the identity provider redirects back.

pub mod render;

use serde::Serialize;
use serde_json::Value;

use crate::credential::factory::ClientFactory;
use crate::credential::TokenBundle;

/// Step of the onboarding flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Exchanging,
    FetchingUser,
    Done,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Exchanging => "exchanging",
            Self::FetchingUser => "fetching_user",
            Self::Done => "done",
        }
    }
}

/// Onboarding state. `Error` is absorbing and remembers where the flow halted.
#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingState {
    Idle,
    Exchanging,
    FetchingUser { token: TokenBundle },
    Done { token: TokenBundle, user: Value },
    Error { halted_at: Phase, token: Option<TokenBundle> },
}

/// Drives [`OnboardingState`] transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Onboarding {
    state: OnboardingState,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self::new()
    }
}

impl Onboarding {
    pub fn new() -> Self {
        Self { state: OnboardingState::Idle }
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    /// Phase the flow is in, or halted in.
    pub fn phase(&self) -> Phase {
        match &self.state {
            OnboardingState::Idle => Phase::Idle,
            OnboardingState::Exchanging => Phase::Exchanging,
            OnboardingState::FetchingUser { .. } => Phase::FetchingUser,
            OnboardingState::Done { .. } => Phase::Done,
            OnboardingState::Error { halted_at, .. } => *halted_at,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, OnboardingState::Error { .. })
    }

    pub fn token(&self) -> Option<&TokenBundle> {
        match &self.state {
            OnboardingState::FetchingUser { token } | OnboardingState::Done { token, .. } => {
                Some(token)
            }
            OnboardingState::Error { token, .. } => token.as_ref(),
            OnboardingState::Idle | OnboardingState::Exchanging => None,
        }
    }

    pub fn user(&self) -> Option<&Value> {
        match &self.state {
            OnboardingState::Done { user, .. } => Some(user),
            _ => None,
        }
    }

    /// `idle -> exchanging`. Fires at most once, and only with a non-empty code.
    pub fn start(&mut self, code: Option<&str>) -> bool {
        let has_code = code.is_some_and(|c| !c.is_empty());
        if self.state != OnboardingState::Idle || !has_code {
            return false;
        }
        self.state = OnboardingState::Exchanging;
        true
    }

    /// `exchanging -> fetching_user` on a bundle with an access token.
    pub fn token_received(&mut self, token: TokenBundle) {
        if self.state != OnboardingState::Exchanging {
            return;
        }
        if token.has_access_token() {
            self.state = OnboardingState::FetchingUser { token };
        } else {
            tracing::error!("token response carried no access token");
            self.fail();
        }
    }

    /// `fetching_user -> done` on a profile object.
    pub fn user_received(&mut self, user: Value) {
        let OnboardingState::FetchingUser { token } = &self.state else {
            return;
        };
        if user.is_object() {
            self.state = OnboardingState::Done { token: token.clone(), user };
        } else {
            tracing::error!("user response was not an object");
            self.fail();
        }
    }

    /// Halt at the current phase.
    pub fn fail(&mut self) {
        if self.is_failed() {
            return;
        }
        let halted_at = self.phase();
        let token = self.token().cloned();
        self.state = OnboardingState::Error { halted_at, token };
    }
}

/// Run the flow for a callback carrying `code` and `state`.
///
/// Failures are logged and leave the flow halted; nothing is retried.
pub async fn drive(factory: &ClientFactory, code: Option<&str>, state: Option<&str>) -> Onboarding {
    let mut flow = Onboarding::new();
    if !flow.start(code) {
        tracing::debug!("onboarding without authorization code, staying idle");
        return flow;
    }

    let (Some(code), Some(state)) = (code, state.filter(|s| !s.is_empty())) else {
        tracing::error!("missing necessary parameters or invalid state");
        flow.fail();
        return flow;
    };

    match factory.exchange_code(state, code).await {
        Ok(token) => flow.token_received(token),
        Err(e) => {
            tracing::error!(err = %e, "error fetching access token");
            flow.fail();
            return flow;
        }
    }

    let Some(token) = flow.token().cloned() else {
        return flow;
    };
    match factory.fetch_current_user(token).await {
        Ok(current) => flow.user_received(current.user),
        Err(e) => {
            tracing::error!(err = %e, "error fetching user data");
            flow.fail();
        }
    }
    flow
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
