// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The refresh call itself.
//!
//! The refresh credential is carried as a cookie, the way the server expects
//! it from a browser. No bearer header is attached and no retry is made: a
//! refresh token may be single-use, so a second attempt would be rejected
//! anyway.

use reqwest::header::{HeaderMap, COOKIE, SET_COOKIE};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::RefreshError;
use crate::transport::HttpTransport;

/// Cookie (and JSON field) name of the refresh credential.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Body returned by the login and refresh endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Credentials granted by a login or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    /// New refresh credential, when the server rotated it.
    pub refresh_token: Option<String>,
}

/// Perform a single refresh request.
pub async fn do_refresh(
    transport: &HttpTransport,
    path: &str,
    refresh_token: Option<&str>,
) -> Result<TokenGrant, RefreshError> {
    let mut req = transport.request(Method::POST, path);
    if let Some(rt) = refresh_token {
        req = req.header(COOKIE, format!("{REFRESH_COOKIE}={rt}"));
    }
    let resp = req.send().await.map_err(|e| RefreshError::Transport(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(RefreshError::Rejected { status: status.as_u16(), message: text });
    }

    let headers = resp.headers().clone();
    let body = resp.bytes().await.map_err(|e| RefreshError::Transport(e.to_string()))?;
    parse_grant(&headers, &body)
}

/// Read a token grant from a successful login or refresh response.
pub(crate) fn parse_grant(headers: &HeaderMap, body: &[u8]) -> Result<TokenGrant, RefreshError> {
    let token: TokenResponse =
        serde_json::from_slice(body).map_err(|e| RefreshError::MalformedResponse(e.to_string()))?;
    if token.access_token.is_empty() {
        return Err(RefreshError::MalformedResponse("empty access_token".to_owned()));
    }
    let refresh_token =
        token.refresh_token.filter(|t| !t.is_empty()).or_else(|| refresh_cookie(headers));
    Ok(TokenGrant { access_token: token.access_token, refresh_token })
}

/// Extract a refresh credential from `Set-Cookie` headers.
///
/// Empty values (the server clearing the cookie) are ignored.
pub fn refresh_cookie(headers: &HeaderMap) -> Option<String> {
    headers.get_all(SET_COOKIE).iter().filter_map(|v| v.to_str().ok()).find_map(|cookie| {
        let pair = cookie.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        let value = value.trim().trim_matches('"');
        (name.trim() == REFRESH_COOKIE && !value.is_empty()).then(|| value.to_owned())
    })
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
