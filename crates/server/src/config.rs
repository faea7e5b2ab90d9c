//! Server configuration
//!
//! Configuration comes from a TOML file when one is present, with
//! environment variables always taking precedence. The defaults match a
//! local development run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config/agroyield.toml";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_ARTIFACT_PATH: &str = "crop_yield_model.json";

/// Runtime configuration for the prediction service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Path to the model artifact bundle
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT_PATH)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            artifact_path: default_artifact_path(),
        }
    }
}

impl ServerConfig {
    /// Load configuration: config file if present, defaults otherwise,
    /// env overrides last.
    pub fn load() -> Result<Self> {
        let path = env::var("AGROYIELD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("AGROYIELD_LISTEN_ADDR") {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                self.listen_addr = trimmed.to_string();
            }
        } else if let Ok(port) = env::var("PORT") {
            if let Ok(port) = port.trim().parse::<u16>() {
                self.listen_addr = format!("0.0.0.0:{port}");
            }
        }

        if let Ok(value) = env::var("AGROYIELD_MODEL_PATH") {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                self.artifact_path = PathBuf::from(trimmed);
            }
        }
    }
}
