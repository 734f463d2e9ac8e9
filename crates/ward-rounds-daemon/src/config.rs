//! Daemon configuration, loaded from `~/.config/ward-rounds/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Upper bound on the tick interval; a day boundary is never noticed later
/// than this.
pub const MAX_TICK_INTERVAL_SECS: u64 = 60;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// SQLite file holding the ward.
    pub database_path: PathBuf,
    /// Seconds between rollover checks. Clamped to `1..=60`.
    pub tick_interval_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            tick_interval_secs: MAX_TICK_INTERVAL_SECS,
        }
    }
}

fn default_database_path() -> PathBuf {
    if let Some(data) = std::env::var_os("XDG_DATA_HOME") {
        PathBuf::from(data).join("ward-rounds").join("ward.db")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("ward-rounds")
            .join("ward.db")
    } else {
        PathBuf::from("/tmp/ward-rounds/ward.db")
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the file at `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/ward-rounds/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("ward-rounds").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("ward-rounds")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/ward-rounds-config/config.toml")
        }
    }

    /// Effective tick interval.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs.clamp(1, MAX_TICK_INTERVAL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DaemonConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(60));
        assert!(config.database_path.ends_with("ward.db"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = DaemonConfig {
            database_path: dir.path().join("ward.db"),
            tick_interval_secs: 15,
        };
        config.save_to_file(&path).unwrap();

        let loaded = DaemonConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tick_interval_secs = 5\n").unwrap();

        let loaded = DaemonConfig::from_file(&path).unwrap();
        assert_eq!(loaded.tick_interval_secs, 5);
        assert_eq!(loaded.database_path, DaemonConfig::default().database_path);
    }

    #[test]
    fn tick_interval_is_clamped() {
        let mut config = DaemonConfig::default();
        config.tick_interval_secs = 0;
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        config.tick_interval_secs = 3600;
        assert_eq!(config.tick_interval(), Duration::from_secs(60));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(matches!(
            DaemonConfig::from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = DaemonConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, DaemonConfig::default());
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = DaemonConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("ward-rounds"));
    }
}
