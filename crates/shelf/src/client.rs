// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The authenticated API client.
//!
//! Every call goes out with the stored bearer credential. A 401 is caught
//! before the caller sees it: the session is refreshed (once, however many
//! calls expired together) and the call is replayed a single time with the new
//! credential. A refresh failure ends the session.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::authenticator::RequestAuthenticator;
use crate::auth::coordinator::RefreshCoordinator;
use crate::auth::refresh;
use crate::config::ClientConfig;
use crate::credential::persist::FileStore;
use crate::credential::{CredentialKind, CredentialStore};
use crate::error::{ClientError, RefreshError};
use crate::library::LibraryApi;
use crate::session::{LogoutReason, SessionController};
use crate::transport::{same_path, ApiRequest, HttpTransport};

/// Application-root context: one per signed-in user.
#[derive(Debug)]
pub struct ApiClient {
    config: ClientConfig,
    transport: HttpTransport,
    authenticator: RequestAuthenticator,
    coordinator: RefreshCoordinator,
    session: SessionController,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

impl ApiClient {
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config)?;
        let authenticator = RequestAuthenticator::new(Arc::clone(&store));
        let session = SessionController::new(store, &config);
        let coordinator = RefreshCoordinator::new();
        Ok(Self { config, transport, authenticator, coordinator, session })
    }

    /// Client backed by the credentials file under the configured state dir.
    pub fn open(config: ClientConfig) -> Result<Self, ClientError> {
        let store = Arc::new(FileStore::open(config.credentials_path()));
        Self::new(config, store)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    pub fn library(&self) -> LibraryApi<'_> {
        LibraryApi::new(self)
    }

    /// Send a request, refreshing and replaying once on 401.
    ///
    /// Any response other than 401 is returned as-is, error statuses included.
    pub async fn send(&self, request: ApiRequest) -> Result<Response, ClientError> {
        let mut request = request;
        let mut token: Option<String> = None;
        loop {
            let builder = self.transport.build(&request);
            let builder = match token {
                Some(ref t) => self.authenticator.with_token(builder, t),
                None => self.authenticator.authenticate(builder),
            };
            let resp = self.transport.execute(builder).await?;
            if resp.status() != StatusCode::UNAUTHORIZED {
                return Ok(resp);
            }

            if request.is_retried() || same_path(&request.path, &self.config.refresh_path) {
                tracing::warn!(
                    method = %request.method,
                    path = %request.path,
                    "unauthorized after refresh"
                );
                return Err(ClientError::Unauthorized { path: request.path });
            }

            tracing::debug!(
                method = %request.method,
                path = %request.path,
                "401, refreshing session"
            );
            let fresh = self.coordinator.run(|| self.refresh_session()).await?;
            request.mark_retried();
            token = Some(fresh);
        }
    }

    /// Send a request and decode a JSON response.
    ///
    /// Non-2xx statuses become [`ClientError::Status`] with the body intact.
    pub async fn json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let resp = checked(self.send(request).await?).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request whose response body is irrelevant.
    pub async fn execute(&self, request: ApiRequest) -> Result<(), ClientError> {
        checked(self.send(request).await?).await?;
        Ok(())
    }

    /// Exchange username and password for a session.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let resp = self
            .transport
            .request(Method::POST, &self.config.login_path)
            .json(&LoginBody { username, password })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::LoginRejected { status: status.as_u16(), message });
        }

        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        let grant = refresh::parse_grant(&headers, &body).map_err(|e| {
            ClientError::LoginRejected { status: status.as_u16(), message: e.to_string() }
        })?;
        if let Some(ref rt) = grant.refresh_token {
            self.session.store_refresh(rt);
        }
        self.session.login(&grant.access_token);
        tracing::info!(user = %username, "signed in");
        Ok(())
    }

    /// End the session locally. Returns whether a session existed.
    pub fn sign_out(&self) -> bool {
        self.session.logout(LogoutReason::UserRequested)
    }

    /// The refresh as run by the coordinator's leader.
    ///
    /// Side effects land before returning so that queued callers released by
    /// the coordinator already observe them.
    async fn refresh_session(&self) -> Result<String, RefreshError> {
        let stored = self.session.store().get(CredentialKind::Refresh);
        match refresh::do_refresh(&self.transport, &self.config.refresh_path, stored.as_deref())
            .await
        {
            Ok(grant) => {
                self.session.refreshed(&grant);
                Ok(grant.access_token)
            }
            Err(e) => {
                tracing::warn!(err = %e, "session refresh failed");
                self.session.logout(LogoutReason::RefreshFailed);
                Err(e)
            }
        }
    }
}

/// Turn a non-2xx response into [`ClientError::Status`].
async fn checked(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(%status, "request failed");
    Err(ClientError::Status { status, body })
}
