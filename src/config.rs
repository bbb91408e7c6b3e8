use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::history::DEFAULT_CAPACITY;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_show_hints")]
    pub show_hints: bool,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_history_limit() -> usize {
    DEFAULT_CAPACITY
}
fn default_show_hints() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            history_limit: default_history_limit(),
            show_hints: default_show_hints(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calcr")
            .join("config.toml")
    }

    /// Where history and logs live unless overridden on the command line.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calcr")
    }

    /// Clamp out-of-range values loaded from disk or the command line.
    /// The history limit can only be lowered below the 23-entry cap.
    pub fn validate(&mut self) {
        self.history_limit = self.history_limit.clamp(1, DEFAULT_CAPACITY);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }
}
