use crate::bibtex::DEFAULT_EXCLUDED_FIELDS;
use crate::copy::ErrorPolicy;
use crate::notify::NotificationStyle;
use crate::utils::paths::{expand_path, get_config_path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Document used when no `--source` is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default)]
    pub notification: NotificationStyle,

    #[serde(default)]
    pub on_error: ErrorPolicy,

    #[serde(default = "default_exclude_fields")]
    pub exclude_fields: Vec<String>,
}

fn default_exclude_fields() -> Vec<String> {
    DEFAULT_EXCLUDED_FIELDS.iter().map(|f| f.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            notification: NotificationStyle::default(),
            on_error: ErrorPolicy::default(),
            exclude_fields: default_exclude_fields(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        Self::from_file(&config_path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    pub fn source_path(&self) -> Option<PathBuf> {
        self.source.as_deref().map(expand_path)
    }
}
