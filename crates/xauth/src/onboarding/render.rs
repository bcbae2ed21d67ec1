// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-side HTML for the Home and Onboarding pages.

use chrono::{Local, TimeZone};
use serde_json::{Map, Value};

use crate::onboarding::{Onboarding, Phase};

/// Keys whose string values are image URLs.
pub const IMAGE_FIELDS: &[&str] = &["profile_image_url", "profile_banner_url"];

/// Key holding an absolute expiry in epoch seconds.
const EXPIRES_AT: &str = "expires_at";

const STYLE: &str = "body{font-family:sans-serif;background:#f3f4f6;color:#1f2937;\
display:flex;flex-direction:column;align-items:center;padding:2rem}\
table{border-collapse:collapse;margin:1rem 0;background:#fff}\
th,td{border:1px solid #d1d5db;padding:.4rem .8rem;text-align:left;vertical-align:top}\
td{font-family:monospace;word-break:break-all}\
.button{background:#3b82f6;color:#fff;padding:.5rem 1rem;border-radius:.25rem;text-decoration:none}";

/// Escape text for HTML element and attribute content.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format epoch seconds as local time, e.g. `2023-11-14 22:13:20 +00:00`.
pub fn format_local_time(secs: i64) -> Option<String> {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S %:z").to_string())
}

/// Render an object as a two-column key/value table.
pub fn render_table(map: &Map<String, Value>) -> String {
    let mut html = String::from("<table>");
    for (key, value) in map {
        html.push_str("<tr><th>");
        html.push_str(&html_escape(key));
        html.push_str("</th><td>");
        html.push_str(&render_value(key, value));
        html.push_str("</td></tr>");
    }
    html.push_str("</table>");
    html
}

/// Render one cell value. Objects nest as tables.
pub fn render_value(key: &str, value: &Value) -> String {
    match value {
        Value::Object(map) => render_table(map),
        Value::Array(items) => {
            items.iter().map(|v| render_value(key, v)).collect::<Vec<_>>().join(", ")
        }
        Value::String(s) if IMAGE_FIELDS.contains(&key) && is_http_url(s) => {
            let src = html_escape(s);
            format!("<img src=\"{src}\" alt=\"{}\">", html_escape(key))
        }
        Value::String(s) => html_escape(s),
        Value::Number(n) if key == EXPIRES_AT => {
            let raw = n.to_string();
            // 0 means no known expiry.
            match n.as_i64().filter(|&secs| secs != 0).and_then(format_local_time) {
                Some(local) => format!("{raw} ({})", html_escape(&local)),
                None => raw,
            }
        }
        Value::Null => String::new(),
        other => html_escape(&other.to_string()),
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("https://") || s.starts_with("http://")
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>{STYLE}</style></head><body><h1>{title}</h1>{body}</body></html>",
        title = html_escape(title),
    )
}

/// Home page with a sign-in link to `login_path`.
pub fn render_home(login_path: &str) -> String {
    let body = format!(
        "<a class=\"button\" href=\"{}\" rel=\"nofollow\">Sign in with X</a>",
        html_escape(login_path)
    );
    page("X OAuth Demo", &body)
}

/// Onboarding page for the flow's current or halted phase.
pub fn render_onboarding(flow: &Onboarding) -> String {
    let mut body = String::new();

    match flow.token() {
        Some(token) => {
            body.push_str("<h2>Access Token</h2>");
            match serde_json::to_value(token) {
                Ok(Value::Object(map)) => body.push_str(&render_table(&map)),
                _ => body.push_str("<p>Unable to display token.</p>"),
            }
        }
        None => body.push_str("<p>Authenticating...</p>"),
    }

    match flow.user() {
        Some(Value::Object(user)) => {
            body.push_str("<h2>User</h2>");
            body.push_str(&render_table(user));
        }
        _ if flow.phase() == Phase::FetchingUser => body.push_str("<p>Loading user data...</p>"),
        _ => {}
    }

    if flow.phase() == Phase::Idle {
        body.push_str("<p><a href=\"/\">Back to sign in</a></p>");
    }

    page("Onboarding", &body)
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
