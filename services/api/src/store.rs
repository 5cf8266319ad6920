//! Local Settings Store
//!
//! A single JSON document on disk standing in for the browser's local
//! storage: the last-used API credential (overwritten whenever a quiz is
//! started, last writer wins) and an optional opaque user identity object.
//! The scope is single-user, so reads and writes are unlocked.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The on-disk settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    /// Credential used for the most recently started quiz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Opaque identity object; nothing beyond an `email` field is expected
    /// of it, and nothing is validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

impl StoredSettings {
    /// The `email` field of the stored user, when both exist.
    pub fn user_email(&self) -> Option<&str> {
        self.user.as_ref()?.get("email")?.as_str()
    }
}

/// File-backed store for [`StoredSettings`].
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the settings document; a missing file is an empty document.
    pub async fn load(&self) -> Result<StoredSettings> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("malformed settings file {}", self.path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(StoredSettings::default())
            }
            Err(err) => Err(err)
                .with_context(|| format!("could not read settings file {}", self.path.display())),
        }
    }

    /// Records the credential used to start a quiz.
    ///
    /// Read-modify-write so the stored user survives; an unreadable document
    /// is replaced rather than kept, since the credential write must win.
    pub async fn remember_credential(&self, credential: &str) -> Result<()> {
        let mut settings = match self.load().await {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = ?err, "Replacing unreadable settings document");
                StoredSettings::default()
            }
        };
        settings.api_key = Some(credential.to_string());

        let json = serde_json::to_string_pretty(&settings)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("could not write settings file {}", self.path.display()))?;
        Ok(())
    }
}
