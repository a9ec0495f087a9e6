#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;

use std::fs;
use std::path;

use anyhow::Result;
use chrono::DateTime;
use chrono::Duration;
use chrono::SecondsFormat;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::DeskError;

pub const KEY_MIN_LEN: usize = 10;
pub const KEY_MAX_LEN: usize = 100;
const TTL_HOURS: i64 = 24;

/// Checked before any network call is made with the key.
pub fn validate_key(key: &str) -> Result<()> {
    if key.len() < KEY_MIN_LEN {
        return Err(DeskError::Validation("Chave de API muito curta".to_string()).into());
    }
    if key.len() > KEY_MAX_LEN {
        return Err(DeskError::Validation("Chave de API muito longa".to_string()).into());
    }

    return Ok(());
}

#[derive(Debug, Serialize, Deserialize)]
struct CredentialFile {
    api_key: String,
    saved_at: String,
}

/// Holds the single operator API key: one in-memory slot plus a TOML file in
/// the config dir so the key survives restarts. Persisted entries expire
/// after 24 hours. Single writer by construction (the actions service).
pub struct CredentialStore {
    path: path::PathBuf,
    key: Option<String>,
}

impl Default for CredentialStore {
    fn default() -> CredentialStore {
        let path = dirs::config_dir().unwrap().join("blipdesk/credential.toml");

        return CredentialStore::new(path);
    }
}

impl CredentialStore {
    pub fn new(path: path::PathBuf) -> CredentialStore {
        return CredentialStore { path, key: None };
    }

    pub fn from_config() -> CredentialStore {
        let configured = Config::get(ConfigKey::CredentialFile);
        if configured.is_empty() {
            return CredentialStore::default();
        }

        return CredentialStore::new(path::PathBuf::from(configured));
    }

    pub fn get_key(&self) -> Option<&str> {
        return self.key.as_deref();
    }

    /// Validates and persists the key. Callers verify the key against the
    /// gateway first; this store only enforces the length window.
    pub fn set_key(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;

        let payload = toml::to_string_pretty(&CredentialFile {
            api_key: key.to_string(),
            saved_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| return DeskError::Storage(err.to_string()))?;
        }
        fs::write(&self.path, payload).map_err(|err| return DeskError::Storage(err.to_string()))?;

        self.key = Some(key.to_string());
        return Ok(());
    }

    /// Loads the persisted key into memory. Entries older than the TTL are
    /// removed and reported as absent.
    pub fn load(&mut self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let payload =
            fs::read_to_string(&self.path).map_err(|err| return DeskError::Storage(err.to_string()))?;
        let file: CredentialFile = match toml::from_str(&payload) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!(error = ?err, "discarding unreadable credential file");
                let _ = fs::remove_file(&self.path);
                return Ok(None);
            }
        };

        let saved_at = DateTime::parse_from_rfc3339(&file.saved_at)
            .map(|dt| return dt.with_timezone(&Utc))
            .unwrap_or_else(|_| return Utc::now() - Duration::hours(TTL_HOURS + 1));

        if Utc::now() - saved_at > Duration::hours(TTL_HOURS) {
            tracing::debug!("persisted credential expired");
            let _ = fs::remove_file(&self.path);
            self.key = None;
            return Ok(None);
        }

        self.key = Some(file.api_key.to_string());
        return Ok(Some(file.api_key));
    }

    /// Removes both the in-memory copy and the persisted file.
    pub fn clear(&mut self) -> Result<()> {
        self.key = None;
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|err| return DeskError::Storage(err.to_string()))?;
        }

        return Ok(());
    }
}
