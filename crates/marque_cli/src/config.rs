//! Marque configuration file handling
//!
//! `marque.toml` is optional. It carries a `[gemini]` table mapped onto
//! [`BridgeConfig`] and an `[output]` table. Command-line flags override file
//! values, and the environment fills in the API key when neither sets one.

use anyhow::{Context, Result};
use marque_ai::{api_key_from_env, BridgeConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is not given
pub const CONFIG_FILE: &str = "marque.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MarqueConfig {
    #[serde(default)]
    pub gemini: BridgeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Where generated concepts are written
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("logos")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Flag values that take precedence over the file
#[derive(Debug, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub image_model: Option<String>,
    pub text_model: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl MarqueConfig {
    /// Load an explicit config file, or `marque.toml` if present, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.exists() {
                    Self::load_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Bridge settings with overrides applied; the key may still be empty
    pub fn bridge_config(&self, overrides: &Overrides) -> BridgeConfig {
        let mut config = self.gemini.clone();
        if let Some(key) = &overrides.api_key {
            config.api_key = key.clone();
        }
        if let Some(model) = &overrides.image_model {
            config.image_model = model.clone();
        }
        if let Some(model) = &overrides.text_model {
            config.text_model = model.clone();
        }
        if let Some(secs) = overrides.timeout_secs {
            config.timeout_secs = secs;
        }
        if !config.has_api_key() {
            if let Some(key) = api_key_from_env() {
                config.api_key = key;
            }
        }
        config
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
