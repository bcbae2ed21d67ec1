// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    bad_request = { ErrorCode::BadRequest, 400, "BAD_REQUEST" },
    upstream = { ErrorCode::UpstreamError, 500, "UPSTREAM_ERROR" },
    internal = { ErrorCode::Internal, 500, "INTERNAL" },
)]
fn status_and_code(code: ErrorCode, status: u16, name: &str) {
    assert_eq!(code.http_status(), status);
    assert_eq!(code.as_str(), name);
    assert_eq!(code.to_string(), name);
}

#[test]
fn http_response_wraps_body() -> anyhow::Result<()> {
    let (status, Json(body)) = ErrorCode::BadRequest.to_http_response("missing code");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let value = serde_json::to_value(&body)?;
    assert_eq!(value["error"]["code"], "BAD_REQUEST");
    assert_eq!(value["error"]["message"], "missing code");
    Ok(())
}
