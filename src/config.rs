use crate::error::ConfigError;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "kanban_config.json";

const DEFAULT_TOAST_SECONDS: i64 = 4;
const MAX_TOAST_SECONDS: i64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON key-value file holding the board
    pub storage_path: PathBuf,
    pub log_path: PathBuf,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    pub toast_seconds: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("kanban_board.json"),
            log_path: PathBuf::from("taskboard.log"),
            log_filter: "info".to_string(),
            toast_seconds: DEFAULT_TOAST_SECONDS,
        }
    }
}

impl Config {
    /// Loads the config, using defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        if !(1..=MAX_TOAST_SECONDS).contains(&config.toast_seconds) {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: format!(
                    "toast_seconds must be between 1 and {MAX_TOAST_SECONDS}, got {}",
                    config.toast_seconds
                ),
            });
        }
        Ok(config)
    }

    /// How long a toast stays in the status line. Out-of-range values fall
    /// back to the default.
    pub fn toast_ttl(&self) -> Duration {
        Duration::try_seconds(self.toast_seconds)
            .filter(|ttl| *ttl > Duration::zero())
            .unwrap_or_else(|| Duration::seconds(DEFAULT_TOAST_SECONDS))
    }

    /// Writes a default config unless one already exists. Returns whether a file
    /// was written.
    pub fn init(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_string_pretty(&Self::default()).map_err(|source| {
            ConfigError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, data).map_err(io_err)?;
        Ok(true)
    }
}
