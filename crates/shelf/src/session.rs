// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session lifecycle: login, logout, and the derived "who am I" view.
//!
//! The session itself is never stored. It is read off the credential store:
//! authenticated means an access credential is present, admin means its
//! claims say so.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::auth::claims::{self, DecodedClaims};
use crate::auth::refresh::TokenGrant;
use crate::config::ClientConfig;
use crate::credential::{CredentialKind, CredentialStore};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    /// The user asked to sign out.
    UserRequested,
    /// The session could not be refreshed.
    RefreshFailed,
}

/// Session lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    LoggedIn,
    /// The access credential was replaced by a refresh.
    Refreshed,
    /// Credentials are gone; the front-end should return to `redirect_to`.
    LoggedOut { reason: LogoutReason, redirect_to: String },
}

/// Owns every write to the credential store.
pub struct SessionController {
    store: Arc<dyn CredentialStore>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    landing_path: String,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    pub fn new(store: Arc<dyn CredentialStore>, config: &ClientConfig) -> Self {
        let (event_tx, _) = broadcast::channel(16);
        Self {
            store,
            access_ttl: config.access_ttl(),
            refresh_ttl: config.refresh_ttl(),
            landing_path: config.landing_path.clone(),
            event_tx,
        }
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Store a freshly issued access credential.
    ///
    /// The refresh credential normally arrives out of band (a cookie) and is
    /// stored separately through [`Self::store_refresh`].
    pub fn login(&self, access_token: &str) {
        self.store.set(CredentialKind::Access, access_token, Some(self.access_ttl));
        tracing::info!(admin = self.is_admin(), "logged in");
        let _ = self.event_tx.send(SessionEvent::LoggedIn);
    }

    pub fn store_refresh(&self, refresh_token: &str) {
        self.store.set(CredentialKind::Refresh, refresh_token, Some(self.refresh_ttl));
    }

    /// Record the outcome of a successful refresh.
    pub fn refreshed(&self, grant: &TokenGrant) {
        self.store.set(CredentialKind::Access, &grant.access_token, Some(self.access_ttl));
        if let Some(ref rt) = grant.refresh_token {
            self.store_refresh(rt);
        }
        tracing::info!(rotated = grant.refresh_token.is_some(), "session refreshed");
        let _ = self.event_tx.send(SessionEvent::Refreshed);
    }

    /// Drop both credentials and announce the redirect.
    ///
    /// Returns `false`, and emits nothing, when there was no session to end.
    pub fn logout(&self, reason: LogoutReason) -> bool {
        if !self.store.clear_all() {
            tracing::debug!(?reason, "logout with no stored session");
            return false;
        }
        tracing::info!(?reason, "logged out");
        let _ = self.event_tx.send(SessionEvent::LoggedOut {
            reason,
            redirect_to: self.landing_path.clone(),
        });
        true
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(CredentialKind::Access)
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Claims of the current access credential.
    pub fn claims(&self) -> DecodedClaims {
        match self.access_token() {
            Some(token) => claims::decode(&token),
            None => DecodedClaims::Malformed,
        }
    }

    /// Admin hint from the access credential. Absent or undecodable claims
    /// mean "not admin".
    pub fn is_admin(&self) -> bool {
        self.claims().is_admin()
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("authenticated", &self.is_authenticated())
            .field("landing_path", &self.landing_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
