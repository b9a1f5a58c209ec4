//! Configuration for the project model tools
//!
//! Settings live in a small TOML file in the platform-appropriate data
//! directory under `dev.eez.project-model`:
//!
//! - **Linux**: `~/.local/share/dev.eez.project-model/model.toml`
//! - **macOS**: `~/Library/Application Support/dev.eez.project-model/model.toml`
//! - **Windows**: `%APPDATA%\dev.eez.project-model\model.toml`
//!
//! # Example
//!
//! ```ignore
//! use project_model::config::ModelConfig;
//!
//! let config = ModelConfig::load_or_default();
//! let tree = serialization::load_tree(registry, &json, "Project", &config.root_id)?;
//! ```

use crate::error::{ModelError, Result};
use crate::model::DEFAULT_ROOT_ID;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.eez.project-model";

/// Config filename
pub const CONFIG_FILE: &str = "model.toml";

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "info";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        ModelError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            ModelError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Model Config ====================

/// Settings shared by the library helpers and the command line tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Identifier given to the root object of loaded documents
    pub root_id: String,

    /// Tracing filter used when `RUST_LOG` is not set
    pub log_filter: String,

    /// Pretty-print JSON output
    pub pretty_json: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            pretty_json: true,
        }
    }
}

impl ModelConfig {
    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ModelError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ModelError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config from the default location, returning defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save config to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ModelError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ModelError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            ModelError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Save config to the default location
    pub fn save_default(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save(dir.join(CONFIG_FILE))
    }

    /// Root ids become the prefix of every object id, so they must be
    /// non-empty and free of the `.` separator.
    pub fn validate(&self) -> Result<()> {
        if self.root_id.is_empty() || self.root_id.contains('.') {
            return Err(ModelError::Config(format!(
                "Invalid root id '{}': must be non-empty and contain no '.'",
                self.root_id
            )));
        }
        Ok(())
    }

    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }
}
