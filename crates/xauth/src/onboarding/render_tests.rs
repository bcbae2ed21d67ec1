// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use super::*;
use crate::credential::TokenBundle;

fn as_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[test]
fn expires_at_renders_raw_and_local_time() {
    let html = render_table(&as_map(json!({ "expires_at": 1_700_000_000 })));
    assert!(html.contains("1700000000 ("), "{html}");
    // 2023-11-14T22:13:20Z falls on the 14th or 15th in every timezone.
    assert!(html.contains("2023-11-14") || html.contains("2023-11-15"), "{html}");
}

#[test]
fn zero_expires_at_renders_raw_only() {
    assert_eq!(render_value("expires_at", &json!(0)), "0");

    let mut flow = Onboarding::new();
    flow.start(Some("code"));
    flow.token_received(TokenBundle::from_access_token("tok"));

    let html = render_onboarding(&flow);
    assert!(html.contains("<th>expires_at</th><td>0</td>"), "{html}");
    assert!(!html.contains("1970-01-01"));
}

#[test]
fn expires_at_key_only_affects_numbers() {
    let html = render_value("expires_at", &json!("soon"));
    assert_eq!(html, "soon");
}

#[test]
fn nested_object_renders_as_table() {
    let profile = json!({
        "username": "jack",
        "public_metrics": { "followers_count": 10, "following_count": 2 }
    });
    let html = render_table(&as_map(profile));
    assert_eq!(html.matches("<table>").count(), 2);
    assert!(html.contains("<th>followers_count</th><td>10</td>"), "{html}");
    assert!(!html.contains("[object Object]"));
    assert!(!html.contains("{\""));
}

#[test]
fn image_field_renders_img() {
    let html = render_value("profile_image_url", &json!("https://pbs.twimg.com/a.jpg"));
    assert_eq!(html, "<img src=\"https://pbs.twimg.com/a.jpg\" alt=\"profile_image_url\">");
}

#[test]
fn image_field_with_non_http_value_stays_text() {
    let html = render_value("profile_image_url", &json!("javascript:alert(1)"));
    assert_eq!(html, "javascript:alert(1)");
}

#[test]
fn values_are_escaped() {
    let html = render_table(&as_map(json!({ "<b>": "<script>\"x\"</script>" })));
    assert!(html.contains("<th>&lt;b&gt;</th>"));
    assert!(html.contains("&lt;script&gt;&quot;x&quot;&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
}

#[yare::parameterized(
    boolean = { json!(true), "true" },
    number = { json!(42), "42" },
    null = { json!(null), "" },
    array = { json!(["a", "b"]), "a, b" },
)]
fn scalar_values(value: Value, expected: &str) {
    assert_eq!(render_value("field", &value), expected);
}

#[test]
fn home_links_to_login() {
    let html = render_home("/login?next=a&b");
    assert!(html.contains("href=\"/login?next=a&amp;b\""));
    assert!(html.contains("rel=\"nofollow\""));
    assert!(html.contains("Sign in with X"));
}

#[test]
fn onboarding_done_shows_token_and_user() {
    let mut flow = Onboarding::new();
    flow.start(Some("code"));
    flow.token_received(TokenBundle {
        access_token: "tok-123".to_owned(),
        token_type: "bearer".to_owned(),
        scope: "users.read".to_owned(),
        refresh_token: None,
        expires_at: 1_700_000_000,
    });
    flow.user_received(json!({ "username": "jack", "public_metrics": { "tweet_count": 5 } }));

    let html = render_onboarding(&flow);
    assert!(html.contains("tok-123"));
    assert!(html.contains("1700000000 ("));
    assert!(html.contains("<th>tweet_count</th>"));
    assert!(!html.contains("Loading user data..."));
}

#[test]
fn onboarding_halted_while_fetching_shows_placeholder() {
    let mut flow = Onboarding::new();
    flow.start(Some("code"));
    flow.token_received(TokenBundle::from_access_token("tok"));
    flow.fail();

    let html = render_onboarding(&flow);
    assert!(html.contains("tok"));
    assert!(html.contains("Loading user data..."));
}

#[test]
fn onboarding_halted_while_exchanging_shows_placeholder() {
    let mut flow = Onboarding::new();
    flow.start(Some("code"));
    flow.fail();

    let html = render_onboarding(&flow);
    assert!(html.contains("Authenticating..."));
    assert!(!html.contains("<table>"));
}
