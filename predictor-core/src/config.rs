use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, fs, path::Path, path::PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://ds-backend-08bb.onrender.com/predict";
pub const DEFAULT_CHART_WIDTH: usize = 40;

/// What to do with a response that arrives after a newer submission started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaleResponsePolicy {
    /// Every response overwrites the outcome, whichever submission it belongs to.
    #[default]
    LastWriteWins,
    /// Only the response to the newest submission is applied.
    LatestOnly,
}

impl StaleResponsePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaleResponsePolicy::LastWriteWins => "last-write-wins",
            StaleResponsePolicy::LatestOnly => "latest-only",
        }
    }

    pub const fn all() -> &'static [StaleResponsePolicy] {
        &[StaleResponsePolicy::LastWriteWins, StaleResponsePolicy::LatestOnly]
    }
}

impl fmt::Display for StaleResponsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for StaleResponsePolicy {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "last-write-wins" => Ok(StaleResponsePolicy::LastWriteWins),
            "latest-only" => Ok(StaleResponsePolicy::LatestOnly),
            _ => Err(anyhow!(
                "Unknown stale response policy '{value}'. Supported: last-write-wins, latest-only."
            )),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Prediction endpoint; falls back to [`DEFAULT_ENDPOINT`].
    pub endpoint: Option<String>,

    pub stale_responses: StaleResponsePolicy,

    /// Width in characters of the longest bar in the terminal chart.
    pub chart_width: Option<usize>,
}

impl Config {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn chart_width(&self) -> usize {
        self.chart_width.filter(|w| *w > 0).unwrap_or(DEFAULT_CHART_WIDTH)
    }

    /// Replace the endpoint. Blank input resets it to the default.
    pub fn set_endpoint(&mut self, endpoint: &str) -> Result<()> {
        let trimmed = endpoint.trim();
        if trimmed.is_empty() {
            self.endpoint = None;
            return Ok(());
        }

        let url = reqwest::Url::parse(trimmed)
            .with_context(|| format!("Invalid endpoint URL: {trimmed}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("Endpoint must use http or https, got '{}'", url.scheme()));
        }

        self.endpoint = Some(trimmed.to_string());
        Ok(())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "temperature-predictor", "predictor-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
