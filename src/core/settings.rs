use crate::shared::paths::{ensure_dir, get_storage_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the chat endpoint.
pub const CHAT_ENDPOINT_ENV: &str = "NEXS_CHAT_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default = "default_chat_endpoint")]
    pub chat_endpoint: String,
    #[serde(default = "default_chat_timeout_secs")]
    pub chat_timeout_secs: u64,
    #[serde(default = "default_reminder_title")]
    pub reminder_title: String,
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,
    #[serde(default = "default_position_poll_ms")]
    pub position_poll_ms: u64,
}

fn default_chat_endpoint() -> String {
    "https://your-backend.com/api/chat".to_string()
}

fn default_chat_timeout_secs() -> u64 {
    30
}

fn default_reminder_title() -> String {
    "⏰ Task Reminder".to_string()
}

fn default_upcoming_limit() -> usize {
    3
}

fn default_position_poll_ms() -> u64 {
    500
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            chat_endpoint: default_chat_endpoint(),
            chat_timeout_secs: default_chat_timeout_secs(),
            reminder_title: default_reminder_title(),
            upcoming_limit: default_upcoming_limit(),
            position_poll_ms: default_position_poll_ms(),
        }
    }
}

impl AppSettings {
    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }

    /// Poll interval for the playback position; never below 50ms.
    pub fn position_poll_interval(&self) -> Duration {
        Duration::from_millis(self.position_poll_ms.max(50))
    }

    fn apply_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(CHAT_ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.chat_endpoint = endpoint.trim().to_string();
            }
        }
        self
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn get_settings_path() -> PathBuf {
    get_storage_dir().join("settings.json")
}

/// Load settings from the default location, falling back to defaults.
pub fn load_settings() -> AppSettings {
    load_settings_at(&get_settings_path())
}

/// Load settings from `path`, falling back to defaults when absent or unreadable.
pub fn load_settings_at(path: &Path) -> AppSettings {
    let settings = if path.exists() {
        load_settings_from_file(path).unwrap_or_else(|e| {
            tracing::warn!(target: "system", "Using default settings: {}", e);
            AppSettings::default()
        })
    } else {
        AppSettings::default()
    };

    settings.apply_env_overrides()
}

fn load_settings_from_file(path: &Path) -> Result<AppSettings, SettingsError> {
    let contents = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&contents)?;
    Ok(settings)
}

pub fn save_settings(settings: &AppSettings) -> Result<(), SettingsError> {
    save_settings_at(&get_settings_path(), settings)
}

pub fn save_settings_at(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent() {
        ensure_dir(dir)?;
    }

    let contents = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, contents)?;
    Ok(())
}
