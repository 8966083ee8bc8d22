// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the authenticated API client.
#[derive(Debug, Clone, clap::Args)]
pub struct ClientConfig {
    /// Base URL of the library API.
    #[arg(long, default_value = "http://127.0.0.1:5000", env = "SHELF_API_URL")]
    pub api_url: String,

    /// Per-request timeout in milliseconds (also bounds the refresh call).
    #[arg(long, default_value_t = 30000, env = "SHELF_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Path of the session refresh endpoint.
    #[arg(long, default_value = "/refresh", env = "SHELF_REFRESH_PATH")]
    pub refresh_path: String,

    /// Path of the login endpoint.
    #[arg(long, default_value = "/login", env = "SHELF_LOGIN_PATH")]
    pub login_path: String,

    /// Unauthenticated entry point announced when a session ends.
    #[arg(long, default_value = "/login", env = "SHELF_LANDING_PATH")]
    pub landing_path: String,

    /// Expiry hint for stored access credentials, in seconds.
    #[arg(long, default_value_t = 3600, env = "SHELF_ACCESS_TTL_SECS")]
    pub access_ttl_secs: u64,

    /// Expiry hint for stored refresh credentials, in seconds.
    #[arg(long, default_value_t = 604800, env = "SHELF_REFRESH_TTL_SECS")]
    pub refresh_ttl_secs: u64,

    /// Directory for persisted credentials.
    #[arg(long, env = "SHELF_STATE_DIR")]
    pub state_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_secs)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_secs)
    }

    /// Resolved state directory (explicit flag, else the platform default).
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(crate::credential::state_dir)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.state_dir().join("credentials.json")
    }
}
