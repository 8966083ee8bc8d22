// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use reqwest::StatusCode;

/// Why a session refresh failed.
///
/// `Clone` because one failed refresh is delivered to every caller that was
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    /// The refresh endpoint answered with a non-2xx status.
    #[error("refresh rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The refresh call never produced a response.
    #[error("refresh request failed: {0}")]
    Transport(String),
    /// The refresh endpoint answered 2xx without a usable access token.
    #[error("malformed refresh response: {0}")]
    MalformedResponse(String),
    /// The task driving the refresh went away before it settled.
    #[error("refresh abandoned before completion")]
    Abandoned,
}

/// Errors surfaced by [`crate::client::ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A 401 that refresh cannot recover: the request was already replayed
    /// once, or it targeted the refresh endpoint itself.
    #[error("unauthorized: {path}")]
    Unauthorized { path: String },
    /// The session could not be refreshed and has been logged out.
    #[error("session expired: {0}")]
    SessionExpired(#[from] RefreshError),
    /// Non-auth HTTP failure, passed through with the server's status and body.
    #[error("request failed ({status}): {body}")]
    Status { status: StatusCode, body: String },
    /// Network-level failure talking to the API.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// The login endpoint refused the supplied credentials.
    #[error("login rejected ({status}): {message}")]
    LoginRejected { status: u16, message: String },
}

impl ClientError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::SessionExpired(_) => "SESSION_EXPIRED",
            Self::Status { .. } => "HTTP_STATUS",
            Self::Transport(_) => "TRANSPORT",
            Self::Decode(_) => "DECODE",
            Self::LoginRejected { .. } => "LOGIN_REJECTED",
        }
    }

    /// Whether the caller must sign in again to make progress.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::SessionExpired(_) | Self::LoginRejected { .. }
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
            Self::SessionExpired(RefreshError::Rejected { status, .. })
            | Self::LoginRejected { status, .. } => StatusCode::from_u16(*status).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
