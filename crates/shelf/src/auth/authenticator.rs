// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use reqwest::RequestBuilder;

use crate::credential::{CredentialKind, CredentialStore};

/// Attaches the stored access credential to outbound requests.
#[derive(Clone)]
pub struct RequestAuthenticator {
    store: Arc<dyn CredentialStore>,
}

impl RequestAuthenticator {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Add `Authorization: Bearer <access>` when an access credential is
    /// stored; otherwise return the request untouched.
    pub fn authenticate(&self, req: RequestBuilder) -> RequestBuilder {
        match self.store.get(CredentialKind::Access) {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Attach a specific token, ignoring the store.
    pub fn with_token(&self, req: RequestBuilder, token: &str) -> RequestBuilder {
        req.bearer_auth(token)
    }
}

impl std::fmt::Debug for RequestAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAuthenticator").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "authenticator_tests.rs"]
mod tests;
