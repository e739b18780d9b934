//! Config directory resolution and the settings file.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use anvil_core::DomainError;
use anvil_services::CommonDateFormatService;

pub const PLUGIN_ID_ENV: &str = "ANVIL_PLUGIN_ID";
pub const PLUGINS_DIR_ENV: &str = "ANVIL_PLUGINS_DIR";

pub const DEFAULT_PLUGIN_ID: &str = "anvil";
pub const DEFAULT_PLUGINS_DIR: &str = "plugins";
pub const CONFIG_FILE_NAME: &str = "anvil.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid plugin id {0:?}")]
    InvalidPluginId(String),

    #[error("unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to render default settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Where the host keeps this plugin's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    plugin_id: String,
    plugins_dir: PathBuf,
}

impl HostConfig {
    pub fn new(plugin_id: impl Into<String>, plugins_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let plugin_id = plugin_id.into();
        if plugin_id.is_empty()
            || plugin_id == "."
            || plugin_id == ".."
            || plugin_id.contains(['/', '\\'])
        {
            return Err(ConfigError::InvalidPluginId(plugin_id));
        }
        Ok(Self {
            plugin_id,
            plugins_dir: plugins_dir.into(),
        })
    }

    /// Resolve from `ANVIL_PLUGIN_ID` / `ANVIL_PLUGINS_DIR`, with defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let plugin_id = lookup(PLUGIN_ID_ENV).unwrap_or_else(|| DEFAULT_PLUGIN_ID.to_string());
        let plugins_dir = lookup(PLUGINS_DIR_ENV).unwrap_or_else(|| DEFAULT_PLUGINS_DIR.to_string());
        Self::new(plugin_id, plugins_dir)
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// `<plugins_dir>/<plugin_id>`
    pub fn config_dir(&self) -> PathBuf {
        self.plugins_dir.join(&self.plugin_id)
    }

    /// `<plugins_dir>/<plugin_id>/anvil.toml`
    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join(CONFIG_FILE_NAME)
    }

    /// Create the config directory (and parents) if it does not exist yet.
    pub fn ensure_config_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = self.config_dir();
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir).map_err(|source| ConfigError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            tracing::info!(path = %dir.display(), "created config directory");
        }
        Ok(dir)
    }
}

/// Contents of the settings file. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `strftime` pattern for the date format service.
    pub date_format: String,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            date_format: CommonDateFormatService::DEFAULT_PATTERN.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

/// Reads (and seeds) the settings file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsLoader {
    path: PathBuf,
}

impl SettingsLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields the defaults.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "settings file missing; using defaults");
                return Ok(Settings::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the default settings if no file exists. Returns whether it wrote.
    pub fn write_defaults_if_missing(&self) -> Result<bool, ConfigError> {
        if self.path.exists() {
            return Ok(false);
        }
        let text = toml::to_string_pretty(&Settings::default())?;
        std::fs::write(&self.path, text).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), "wrote default settings");
        Ok(true)
    }
}
