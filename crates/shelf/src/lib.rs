// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shelf: authenticated client for a personal game library API.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod library;
pub mod session;
pub mod test_support;
pub mod transport;

pub use crate::client::ApiClient;
pub use crate::config::ClientConfig;
pub use crate::error::{ClientError, RefreshError};
pub use crate::transport::ApiRequest;
