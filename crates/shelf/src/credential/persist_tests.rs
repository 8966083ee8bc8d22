// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::*;

#[test]
fn values_survive_reopen() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("credentials.json");

    let store = FileStore::open(&path);
    store.set(CredentialKind::Access, "access-1", Some(Duration::from_secs(3600)));
    store.set(CredentialKind::Refresh, "refresh-1", None);
    drop(store);

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get(CredentialKind::Access).as_deref(), Some("access-1"));
    assert_eq!(reopened.get(CredentialKind::Refresh).as_deref(), Some("refresh-1"));
    Ok(())
}

#[test]
fn file_uses_named_slots() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("credentials.json");

    let store = FileStore::open(&path);
    store.set(CredentialKind::Access, "a", None);

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(raw["slots"]["access_token"]["value"], "a");
    assert!(raw["slots"].get("refresh_token").is_none());
    Ok(())
}

#[test]
fn creates_missing_parent_directory() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("nested/state/credentials.json");

    let store = FileStore::open(&path);
    store.set(CredentialKind::Refresh, "r", None);
    assert!(path.exists());
    Ok(())
}

#[test]
fn expired_entries_dropped_on_load() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("credentials.json");

    let mut slots = Slots::new();
    slots.insert(
        CredentialKind::Access,
        StoredCredential { value: "expired".to_owned(), expires_at: 10 },
    );
    slots.insert(
        CredentialKind::Refresh,
        StoredCredential { value: "live".to_owned(), expires_at: 0 },
    );
    save(&path, &PersistedCredentials { slots })?;

    let store = FileStore::open(&path);
    assert_eq!(store.get(CredentialKind::Access), None);
    assert_eq!(store.get(CredentialKind::Refresh).as_deref(), Some("live"));
    Ok(())
}

#[test]
fn corrupt_file_opens_empty() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("credentials.json");
    std::fs::write(&path, "{not json")?;

    let store = FileStore::open(&path);
    assert_eq!(store.get(CredentialKind::Access), None);

    store.set(CredentialKind::Access, "fresh", None);
    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get(CredentialKind::Access).as_deref(), Some("fresh"));
    Ok(())
}

#[test]
fn clear_all_removes_file() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("credentials.json");

    let store = FileStore::open(&path);
    store.set(CredentialKind::Access, "a", None);
    store.set(CredentialKind::Refresh, "r", None);
    assert!(path.exists());

    assert!(store.clear_all());
    assert!(!path.exists());
    assert!(!store.clear_all());

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get(CredentialKind::Access), None);
    assert_eq!(reopened.get(CredentialKind::Refresh), None);
    Ok(())
}

#[test]
fn clear_single_slot_keeps_the_other() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("credentials.json");

    let store = FileStore::open(&path);
    store.set(CredentialKind::Access, "a", None);
    store.set(CredentialKind::Refresh, "r", None);
    assert!(store.clear(CredentialKind::Access));

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get(CredentialKind::Access), None);
    assert_eq!(reopened.get(CredentialKind::Refresh).as_deref(), Some("r"));
    Ok(())
}

#[test]
fn no_temp_files_left_behind() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("credentials.json");

    let store = FileStore::open(&path);
    for i in 0..5 {
        store.set(CredentialKind::Access, &format!("tok-{i}"), None);
    }

    let leftovers = std::fs::read_dir(tmp.path())?
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
    Ok(())
}

#[cfg(unix)]
#[test]
fn credentials_file_is_owner_only() -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("credentials.json");

    let store = FileStore::open(&path);
    store.set(CredentialKind::Refresh, "secret", None);
    assert_eq!(std::fs::metadata(&path)?.permissions().mode() & 0o777, 0o600);

    // Rewrites keep the mode.
    store.set(CredentialKind::Access, "a", None);
    assert_eq!(std::fs::metadata(&path)?.permissions().mode() & 0o777, 0o600);
    Ok(())
}
