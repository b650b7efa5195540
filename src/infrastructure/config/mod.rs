//! Configuration management

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Directory name under the user data directory
pub const APP_NAME: &str = "allo-code";

/// Name of the group table document inside the data directory
pub const DEFAULT_FILE_NAME: &str = "user_groups.json";

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    /// Long-poll timeout for getUpdates, in seconds
    pub poll_timeout: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
    pub file_name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "allo-bot".to_string(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            poll_timeout: 30,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Apply `ALLO_TOKEN` and `ALLO_DATA_DIR` on top of this config
    pub fn with_env(mut self) -> Self {
        if let Ok(token) = std::env::var("ALLO_TOKEN") {
            if !token.is_empty() {
                self.telegram.token = Some(token);
            }
        }

        if let Some(dir) = std::env::var_os("ALLO_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.storage.file_name;
        if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') {
            return Err(ConfigError::InvalidValue(format!(
                "storage.file-name must be a plain file name, got {:?}",
                name
            )));
        }
        Ok(())
    }

    /// Telegram token, required to run against Telegram
    pub fn telegram_token(&self) -> Result<&str, ConfigError> {
        self.telegram
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingField("telegram.token".to_string()))
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Full path of the group table document
    pub fn data_file(&self) -> PathBuf {
        self.data_dir().join(&self.storage.file_name)
    }
}

/// `$XDG_DATA_HOME/allo-code`, falling back to `~/.local/share/allo-code`
pub fn default_data_dir() -> PathBuf {
    data_dir_from(std::env::var_os("XDG_DATA_HOME"), dirs::home_dir())
}

fn data_dir_from(xdg_data_home: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    if let Some(xdg) = xdg_data_home.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_NAME);
    }

    match home {
        Some(home) => home.join(".local").join("share").join(APP_NAME),
        None => PathBuf::from(APP_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_prefers_xdg() {
        let dir = data_dir_from(Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/xdg/allo-code"));
    }

    #[test]
    fn test_data_dir_falls_back_to_home() {
        let dir = data_dir_from(Some("".into()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/home/u/.local/share/allo-code"));

        assert_eq!(data_dir_from(None, None), PathBuf::from("allo-code"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("storage:\n  data-dir: /srv/allo\n").unwrap();
        assert_eq!(config.data_file(), PathBuf::from("/srv/allo/user_groups.json"));
        assert_eq!(config.telegram.poll_timeout, 30);
        assert!(config.telegram_token().is_err());
    }

    #[test]
    fn test_rejects_nested_file_name() {
        let err = Config::from_yaml("storage:\n  file-name: ../groups.json\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_yaml_roundtrip_of_defaults() {
        let yaml = Config::default().to_yaml().unwrap();
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.bot.name, "allo-bot");
        assert_eq!(config.storage.file_name, DEFAULT_FILE_NAME);
    }
}
