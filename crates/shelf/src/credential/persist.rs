// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable credential store: a JSON file with atomic writes.
//!
//! The in-memory copy is authoritative. Every mutation is mirrored to disk on
//! a best-effort basis; a failed write is logged and the process carries on
//! with the in-memory state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::credential::{
    epoch_secs, live_value, CredentialKind, CredentialStore, Slots, StoredCredential,
};

/// On-disk layout of the credentials file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PersistedCredentials {
    #[serde(default)]
    pub slots: Slots,
}

/// Load persisted credentials from a JSON file.
pub fn load(path: &Path) -> anyhow::Result<PersistedCredentials> {
    let contents = std::fs::read_to_string(path)?;
    let creds: PersistedCredentials = serde_json::from_str(&contents)?;
    Ok(creds)
}

/// Save persisted credentials to a JSON file atomically (write tmp + rename).
///
/// Uses a unique temp filename (PID + counter) so concurrent saves never
/// share a temp file.
pub fn save(path: &Path, creds: &PersistedCredentials) -> anyhow::Result<()> {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let json = serde_json::to_string_pretty(creds)?;
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        "{}.{}.{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id(),
        seq,
    );
    let tmp_path = path.with_file_name(tmp_name);
    write_private(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Create `path` readable by the owner only, then write `contents`.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// File-backed credential store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    slots: RwLock<Slots>,
}

impl FileStore {
    /// Open the store at `path`, seeding it from disk when the file exists.
    ///
    /// Expired entries are dropped. An unreadable file is treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut slots = if path.exists() {
            match load(&path) {
                Ok(creds) => creds.slots,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        err = %e,
                        "ignoring unreadable credentials file"
                    );
                    Slots::new()
                }
            }
        } else {
            Slots::new()
        };
        let now = epoch_secs();
        slots.retain(|_, c| !c.is_expired_at(now));
        tracing::debug!(path = %path.display(), slots = slots.len(), "credential store opened");
        Self { path, slots: RwLock::new(slots) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mirror the given slots to disk. Removes the file when nothing is left.
    fn persist(&self, slots: &Slots) {
        if slots.is_empty() {
            if self.path.exists() {
                if let Err(e) = std::fs::remove_file(&self.path) {
                    tracing::warn!(
                        path = %self.path.display(),
                        err = %e,
                        "failed to remove credentials file"
                    );
                }
            }
            return;
        }
        let creds = PersistedCredentials { slots: slots.clone() };
        if let Err(e) = save(&self.path, &creds) {
            tracing::warn!(path = %self.path.display(), err = %e, "failed to persist credentials");
        }
    }
}

impl CredentialStore for FileStore {
    fn get(&self, kind: CredentialKind) -> Option<String> {
        live_value(&self.slots.read(), kind)
    }

    fn set(&self, kind: CredentialKind, value: &str, ttl: Option<Duration>) {
        let mut slots = self.slots.write();
        slots.insert(kind, StoredCredential::new(value, ttl));
        self.persist(&slots);
    }

    fn clear(&self, kind: CredentialKind) -> bool {
        let mut slots = self.slots.write();
        let removed = slots.remove(&kind).is_some();
        if removed {
            self.persist(&slots);
        }
        removed
    }

    fn clear_all(&self) -> bool {
        let mut slots = self.slots.write();
        let had_any = !slots.is_empty();
        slots.clear();
        self.persist(&slots);
        had_any
    }
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;
