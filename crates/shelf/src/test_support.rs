// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers shared by unit and integration tests.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::config::ClientConfig;

/// Client config pointed at `api_url` with short timeouts and no state dir.
pub fn test_config(api_url: &str) -> ClientConfig {
    ClientConfig {
        api_url: api_url.to_owned(),
        timeout_ms: 5000,
        refresh_path: "/refresh".to_owned(),
        login_path: "/login".to_owned(),
        landing_path: "/login".to_owned(),
        access_ttl_secs: 3600,
        refresh_ttl_secs: 604800,
        state_dir: None,
    }
}

/// Build an unsigned JWT-shaped token carrying `claims`.
pub fn fake_jwt(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{header}.{payload}.unsigned")
}
