// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-local credential store.

use std::time::Duration;

use parking_lot::RwLock;

use crate::credential::{live_value, CredentialKind, CredentialStore, Slots, StoredCredential};

/// In-memory store. Credentials vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<Slots>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, kind: CredentialKind) -> Option<String> {
        live_value(&self.slots.read(), kind)
    }

    fn set(&self, kind: CredentialKind, value: &str, ttl: Option<Duration>) {
        self.slots.write().insert(kind, StoredCredential::new(value, ttl));
    }

    fn clear(&self, kind: CredentialKind) -> bool {
        self.slots.write().remove(&kind).is_some()
    }

    fn clear_all(&self) -> bool {
        let mut slots = self.slots.write();
        let had_any = !slots.is_empty();
        slots.clear();
        had_any
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
