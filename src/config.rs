use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::paths::get_config_path;

pub const DEFAULT_CHANNEL: &str = "fcode/image_clipboard";

/// What `copyImage` answers when the file cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeFailurePolicy {
    /// Log the failure and still answer success.
    #[default]
    Ignore,
    /// Answer with a `DECODE_FAILED` error.
    Report,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_channel")]
    pub channel: String,

    #[serde(default)]
    pub decode_failure: DecodeFailurePolicy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    #[serde(default = "default_hold_on_linux")]
    pub hold_on_linux: bool,
}

fn default_channel() -> String {
    DEFAULT_CHANNEL.to_string()
}

fn default_hold_on_linux() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            decode_failure: DecodeFailurePolicy::default(),
            base_dir: None,
            hold_on_linux: default_hold_on_linux(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

        Ok(config)
    }
}
