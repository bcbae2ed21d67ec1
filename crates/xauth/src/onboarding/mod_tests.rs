// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use super::*;

fn bundle(access: &str) -> TokenBundle {
    TokenBundle {
        access_token: access.to_owned(),
        token_type: "bearer".to_owned(),
        scope: "users.read".to_owned(),
        refresh_token: Some("r".to_owned()),
        expires_at: 1_700_000_000,
    }
}

#[test]
fn happy_path_reaches_done() {
    let mut flow = Onboarding::new();
    assert_eq!(flow.phase(), Phase::Idle);

    assert!(flow.start(Some("code-1")));
    assert_eq!(flow.phase(), Phase::Exchanging);

    flow.token_received(bundle("tok"));
    assert_eq!(flow.phase(), Phase::FetchingUser);
    assert_eq!(flow.token().map(|t| t.access_token.as_str()), Some("tok"));

    flow.user_received(json!({ "id": "1", "username": "jack" }));
    assert_eq!(flow.phase(), Phase::Done);
    assert_eq!(flow.user().and_then(|u| u["username"].as_str()), Some("jack"));
    assert!(!flow.is_failed());
}

#[yare::parameterized(
    missing = { None },
    empty = { Some("") },
)]
fn start_requires_code(code: Option<&str>) {
    let mut flow = Onboarding::new();
    assert!(!flow.start(code));
    assert_eq!(flow.state(), &OnboardingState::Idle);
}

#[test]
fn start_fires_once() {
    let mut flow = Onboarding::new();
    assert!(flow.start(Some("code-1")));
    assert!(!flow.start(Some("code-1")));
    assert_eq!(flow.phase(), Phase::Exchanging);
}

#[test]
fn empty_access_token_halts_while_exchanging() {
    let mut flow = Onboarding::new();
    flow.start(Some("code-1"));
    flow.token_received(bundle(""));

    assert!(flow.is_failed());
    assert_eq!(flow.phase(), Phase::Exchanging);
    assert!(flow.token().is_none());
}

#[test]
fn non_object_user_halts_while_fetching() {
    let mut flow = Onboarding::new();
    flow.start(Some("code-1"));
    flow.token_received(bundle("tok"));
    flow.user_received(json!(null));

    assert!(flow.is_failed());
    assert_eq!(flow.phase(), Phase::FetchingUser);
    assert!(flow.token().is_some());
    assert!(flow.user().is_none());
}

#[test]
fn error_is_absorbing() {
    let mut flow = Onboarding::new();
    flow.start(Some("code-1"));
    flow.fail();
    let halted = flow.clone();

    flow.token_received(bundle("tok"));
    flow.user_received(json!({ "id": "1" }));
    flow.fail();
    assert!(!flow.start(Some("code-2")));
    assert_eq!(flow, halted);
}

#[test]
fn out_of_order_events_are_ignored() {
    let mut flow = Onboarding::new();
    flow.token_received(bundle("tok"));
    flow.user_received(json!({ "id": "1" }));
    assert_eq!(flow.state(), &OnboardingState::Idle);
}

#[test]
fn phase_names() {
    assert_eq!(Phase::FetchingUser.as_str(), "fetching_user");
    assert_eq!(serde_json::to_value(Phase::FetchingUser).ok(), Some(json!("fetching_user")));
}
