// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential storage: named slots for the access and refresh tokens.
//!
//! Stores are opaque string containers. They never inspect token structure;
//! the only thing they understand is an expiry hint, after which a slot reads
//! as empty (the same way an expired cookie disappears from a browser).

pub mod memory;
pub mod persist;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Which credential a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialKind {
    #[serde(rename = "access_token")]
    Access,
    #[serde(rename = "refresh_token")]
    Refresh,
}

impl CredentialKind {
    pub const ALL: [CredentialKind; 2] = [CredentialKind::Access, CredentialKind::Refresh];

    /// Slot name used on disk and in logs.
    pub fn slot(&self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Refresh => "refresh_token",
        }
    }
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slot())
    }
}

/// A stored credential value with its expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    pub value: String,
    /// Expiry as epoch seconds. `0` means no expiry.
    #[serde(default)]
    pub expires_at: u64,
}

impl StoredCredential {
    pub fn new(value: &str, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|t| epoch_secs().saturating_add(t.as_secs())).unwrap_or(0);
        Self { value: value.to_owned(), expires_at }
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at != 0 && self.expires_at <= now
    }
}

/// Slot map shared by the store implementations.
pub(crate) type Slots = HashMap<CredentialKind, StoredCredential>;

/// Read a live (non-expired) value out of a slot map.
pub(crate) fn live_value(slots: &Slots, kind: CredentialKind) -> Option<String> {
    slots.get(&kind).filter(|c| !c.is_expired_at(epoch_secs())).map(|c| c.value.clone())
}

/// Storage for the access and refresh credentials.
///
/// Implementations must be safe to share between tasks; every method is
/// synchronous and completes without awaiting.
pub trait CredentialStore: Send + Sync {
    /// Current value of a slot, or `None` when empty or expired.
    fn get(&self, kind: CredentialKind) -> Option<String>;

    /// Replace a slot. `ttl` is an expiry hint; `None` never expires.
    fn set(&self, kind: CredentialKind, value: &str, ttl: Option<Duration>);

    /// Empty a slot. Returns whether a value was removed.
    fn clear(&self, kind: CredentialKind) -> bool;

    /// Empty every slot. Returns whether any value was removed.
    fn clear_all(&self) -> bool;
}

/// Resolve the state directory for persisted credentials.
///
/// Checks `SHELF_STATE_DIR`, then `$XDG_STATE_HOME/shelf`,
/// then `$HOME/.local/state/shelf`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SHELF_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("shelf");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/state/shelf");
    }
    PathBuf::from(".shelf")
}

pub(crate) fn epoch_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}
