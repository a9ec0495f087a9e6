use anyhow::Result;
use chrono::Duration;
use chrono::SecondsFormat;
use chrono::Utc;

use super::validate_key;
use super::CredentialStore;

#[test]
fn it_validates_key_lengths() {
    assert!(validate_key("abcdefghij").is_ok());
    assert!(validate_key(&"k".repeat(100)).is_ok());
    assert!(validate_key("short").is_err());
    assert!(validate_key(&"k".repeat(101)).is_err());
}

#[test]
fn it_round_trips_a_key_through_a_reload() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("credential.toml");

    let mut store = CredentialStore::new(path.clone());
    store.set_key("abcdefghij")?;
    assert_eq!(store.get_key(), Some("abcdefghij"));

    // A fresh store over the same file simulates a process restart.
    let mut reloaded = CredentialStore::new(path);
    assert_eq!(reloaded.load()?, Some("abcdefghij".to_string()));
    assert_eq!(reloaded.get_key(), Some("abcdefghij"));

    return Ok(());
}

#[test]
fn it_rejects_keys_outside_the_length_window() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut store = CredentialStore::new(dir.path().join("credential.toml"));

    assert!(store.set_key("tooshort").is_err());
    assert!(store.get_key().is_none());

    return Ok(());
}

#[test]
fn it_expires_persisted_keys_after_the_ttl() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("credential.toml");

    let stale = Utc::now() - Duration::hours(25);
    let payload = format!(
        "api_key = \"abcdefghij\"\nsaved_at = \"{}\"\n",
        stale.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    std::fs::write(&path, payload)?;

    let mut store = CredentialStore::new(path.clone());
    assert_eq!(store.load()?, None);
    assert!(!path.exists());

    return Ok(());
}

#[test]
fn it_clears_memory_and_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("credential.toml");

    let mut store = CredentialStore::new(path.clone());
    store.set_key("abcdefghij")?;
    store.clear()?;

    assert!(store.get_key().is_none());
    assert!(!path.exists());

    return Ok(());
}
