use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::Decision;

/// Environment variable that overrides `api.base_url`
pub const BASE_URL_ENV: &str = "QUALITY_GATE_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub gate: GateConfig,
    pub report: ReportConfig,
}

/// Review service location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the review service; no default, deployments must set it
    pub base_url: Option<String>,
}

/// CI gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Decisions that fail the gate
    pub fail_on: Vec<Decision>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            fail_on: vec![Decision::Block],
        }
    }
}

/// Report rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Character width of the score bars
    pub bar_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { bar_width: 20 }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Load configuration from the default location (.quality-gate/config.yml)
    pub fn load_default() -> Result<Self> {
        Self::load(".quality-gate/config.yml")
    }

    /// Apply an explicitly supplied base URL (flag or environment)
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = Some(url);
        }
        self
    }

    /// Resolved base URL; must be present and non-blank before the first request
    pub fn base_url(&self) -> Result<&str> {
        match self.api.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => anyhow::bail!(
                "Review service base URL is not configured. Set {} or api.base_url in the config file",
                BASE_URL_ENV
            ),
        }
    }
}
