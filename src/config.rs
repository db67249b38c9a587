//! Persisted application configuration.
//!
//! The configuration is a flat record holding the Facebook application
//! credentials and the access token acquired by `fbcli login`, stored as
//! YAML in the platform-specific local data directory:
//!
//! - Linux: `~/.local/share/fbcli/config.yaml`
//! - macOS: `~/Library/Application Support/fbcli/config.yaml`
//! - Windows: `%LOCALAPPDATA%/fbcli/config.yaml`
//!
//! It is read once at startup and written once at the end of a mutating
//! command (`config`, `login`). Concurrent invocations against the same
//! file are not synchronized; the last writer wins.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::GraphError;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file yet. The command layer turns this into
    /// first-run setup instructions.
    #[error("no configuration found at {0}")]
    NotFound(PathBuf),

    #[error("cannot access configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app_id: u64,
    pub app_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Config {
    pub async fn load() -> Result<Self, ConfigError> {
        let path = Self::path();
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_yaml::from_str(&content)?)
    }

    pub async fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let yaml = serde_yaml::to_string(self)?;
        async_fs::write(path, yaml).await?;
        Ok(())
    }

    /// The configured access token, or `MissingToken` so callers can point
    /// the user at `fbcli login`.
    pub fn require_token(&self) -> Result<&str, GraphError> {
        match self.access_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(GraphError::MissingToken),
        }
    }

    pub fn path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("fbcli/config.yaml");
        path
    }
}

/// Setup instructions shown when no configuration exists yet.
pub fn first_run_help() -> String {
    format!(
        "It looks like you are running fbcli for the first time.\n\
         \n\
         The following steps are necessary to use the Facebook API:\n\
         \n\
         - Create a new application at: https://developers.facebook.com/apps\n\
         - In the Settings tab, set \"Site URL\" to \"http://localhost\" and\n\
        \u{20}  then under \"App Domains\" add \"localhost\", and click \"Save\"\n\
         - In the \"App Review\" tab, flip the switch to make your app live.\n\
         - Save the App ID and App Secret by running:\n\
         \n\
        \u{20}   fbcli config --app-id <app-id> --app-secret <app-secret>\n\
         \n\
         After that, acquire an access token by running: fbcli login\n\
         \n\
         (expected configuration at {})",
        Config::path().display()
    )
}
