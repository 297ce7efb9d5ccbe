use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "WATCH_SCOUT_CONFIG";

fn default_output_path() -> PathBuf {
    PathBuf::from("watchData.json")
}

/// Operator configuration, read once at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// First listing page of the catalog
    #[serde(alias = "PARENT_URL")]
    pub parent_url: String,
    /// Pause between runs in watch mode
    #[serde(alias = "CHECK_INTERVAL", default)]
    pub check_interval_ms: u64,
    #[serde(alias = "BACK_END_URL", default)]
    pub backend_url: Option<String>,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(raw).context("Failed to parse config JSON")?;

        config.backend_url = config
            .backend_url
            .take()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        config.parent_url()?;
        Ok(config)
    }

    pub fn parent_url(&self) -> Result<Url> {
        Url::parse(&self.parent_url)
            .with_context(|| format!("parentUrl is not an absolute URL: {}", self.parent_url))
    }

    /// Scheme and host of the catalog, used to absolutize relative links
    pub fn base_origin(&self) -> Result<String> {
        Ok(self.parent_url()?.origin().ascii_serialization())
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}
