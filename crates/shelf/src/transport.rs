// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport and the replayable request descriptor.

use std::sync::Once;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Description of an API call, kept so it can be replayed after a refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None, retried: false }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Whether this request is already a replay after a refresh.
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }
}

static CRYPTO_PROVIDER: Once = Once::new();

/// Install the rustls crypto provider (reqwest needs one even for plain HTTP).
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Thin wrapper over `reqwest` bound to one API base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        ensure_crypto_provider();
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { base_url: config.api_url.trim_end_matches('/').to_owned(), client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Start a raw request. Nothing is attached; callers add credentials.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Build a request from a descriptor.
    pub fn build(&self, req: &ApiRequest) -> RequestBuilder {
        let mut builder = self.request(req.method.clone(), &req.path);
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(ref body) = req.body {
            builder = builder.json(body);
        }
        builder
    }

    pub async fn execute(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        Ok(builder.send().await?)
    }
}

/// Compare two API paths ignoring query strings and trailing slashes.
pub(crate) fn same_path(a: &str, b: &str) -> bool {
    fn norm(p: &str) -> &str {
        let p = p.split('?').next().unwrap_or(p);
        let p = p.trim_end_matches('/');
        p.trim_start_matches('/')
    }
    norm(a) == norm(b)
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
