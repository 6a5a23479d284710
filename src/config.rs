//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then environment variables, then command-line flags applied by the CLI
//! through the `with_*` builder methods.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_NIGHTSCOUT_SECRET, ENV_NIGHTSCOUT_URL,
    NIGHTSCOUT_MAX_REQUESTS, NIGHTSCOUT_PAGE_SIZE, NIGHTSCOUT_TIMEOUT_SECS, RANGE_HIGH_MMOL,
    RANGE_LOW_MMOL,
};
use crate::{Error, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub nightscout: NightscoutConfig,
    pub range: RangeConfig,
    pub output: OutputConfig,
}

/// Nightscout server and paging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NightscoutConfig {
    /// Server base URL, e.g. `https://my.nightscout.example`
    pub base_url: Option<String>,

    /// Value sent in the `API-SECRET` header
    pub api_secret: Option<String>,

    /// Entries requested per page
    pub page_size: usize,

    /// Page requests allowed before giving up
    pub max_requests: usize,

    /// HTTP timeout per request in seconds
    pub timeout_secs: u64,
}

impl Default for NightscoutConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_secret: None,
            page_size: NIGHTSCOUT_PAGE_SIZE,
            max_requests: NIGHTSCOUT_MAX_REQUESTS,
            timeout_secs: NIGHTSCOUT_TIMEOUT_SECS,
        }
    }
}

/// Target glucose range in mmol/L, both bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    pub low_mmol: f64,
    pub high_mmol: f64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            low_mmol: RANGE_LOW_MMOL,
            high_mmol: RANGE_HIGH_MMOL,
        }
    }
}

impl RangeConfig {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low_mmol && value <= self.high_mmol
    }
}

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Coloured human-readable summary
    #[default]
    Text,
    /// `ParseResponse` as JSON
    Json,
}

/// Report settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Include per-day range percentages
    pub daily: bool,
}

impl Config {
    /// Set the Nightscout base URL
    pub fn with_nightscout_url(mut self, url: impl Into<String>) -> Self {
        self.nightscout.base_url = Some(url.into());
        self
    }

    /// Set the Nightscout API secret
    pub fn with_api_secret(mut self, secret: impl Into<String>) -> Self {
        self.nightscout.api_secret = Some(secret.into());
        self
    }

    /// Set the page request bound
    pub fn with_max_requests(mut self, max_requests: usize) -> Self {
        self.nightscout.max_requests = max_requests;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output.format = format;
        self
    }

    pub fn with_daily(mut self, daily: bool) -> Self {
        self.output.daily = daily;
        self
    }

    /// Override Nightscout settings from environment lookups
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_NIGHTSCOUT_URL).filter(|v| !v.trim().is_empty()) {
            debug!("Nightscout URL taken from {}", ENV_NIGHTSCOUT_URL);
            self.nightscout.base_url = Some(url);
        }
        if let Some(secret) = lookup(ENV_NIGHTSCOUT_SECRET).filter(|v| !v.is_empty()) {
            debug!("Nightscout secret taken from {}", ENV_NIGHTSCOUT_SECRET);
            self.nightscout.api_secret = Some(secret);
        }
        self
    }

    /// Check settings that would make fetching or aggregation meaningless
    pub fn validate(&self) -> Result<()> {
        if self.nightscout.page_size == 0 {
            return Err(Error::configuration("nightscout.page_size must be positive"));
        }
        if self.nightscout.max_requests == 0 {
            return Err(Error::configuration(
                "nightscout.max_requests must be positive",
            ));
        }
        if self.nightscout.timeout_secs == 0 {
            return Err(Error::configuration(
                "nightscout.timeout_secs must be positive",
            ));
        }
        if !(self.range.low_mmol > 0.0 && self.range.low_mmol < self.range.high_mmol) {
            return Err(Error::configuration(format!(
                "range must satisfy 0 < low < high (got {} to {})",
                self.range.low_mmol, self.range.high_mmol
            )));
        }
        Ok(())
    }
}

/// Default config file location (`<config_dir>/cgm-processor/config.toml`)
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from a TOML file
pub fn load_from(path: &Path) -> anyhow::Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config {:?}: {}", path, e))?;
    Ok(config)
}

/// Load configuration from `path`, or the default location when it exists,
/// then apply environment overrides
pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => load_from(path)?,
        None => {
            let default_path = default_config_path()?;
            if default_path.exists() {
                debug!("Loading config from {:?}", default_path);
                load_from(&default_path)?
            } else {
                Config::default()
            }
        }
    };

    Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.nightscout.page_size, 1440);
        assert_eq!(config.nightscout.max_requests, 1000);
        assert_eq!(config.range.low_mmol, 3.9);
        assert_eq!(config.range.high_mmol, 10.0);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let range = RangeConfig::default();
        assert!(range.contains(3.9));
        assert!(range.contains(10.0));
        assert!(!range.contains(3.89));
        assert!(!range.contains(10.01));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[nightscout]\nbase_url = \"https://ns.example.org\"\nmax_requests = 50\n\n[output]\nformat = \"json\""
        )
        .unwrap();

        let config = load_from(file.path()).unwrap();

        assert_eq!(
            config.nightscout.base_url.as_deref(),
            Some("https://ns.example.org")
        );
        assert_eq!(config.nightscout.max_requests, 50);
        assert_eq!(config.nightscout.page_size, 1440);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.range, RangeConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[range]\nlow_mmol = 10.0\nhigh_mmol = 3.9").unwrap();

        let err = load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[nightscout\npage_size = ").unwrap();

        assert!(load_from(file.path()).is_err());
    }

    #[test]
    fn test_validate_zero_bounds() {
        let config = Config::default().with_max_requests(0);
        assert_eq!(config.validate().unwrap_err().message_class(), "Configuration");

        let mut config = Config::default();
        config.nightscout.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_nightscout_url("https://file.example.org")
            .with_env_overrides(|key| match key {
                "NIGHTSCOUT_URL" => Some("https://env.example.org".to_string()),
                "NIGHTSCOUT_API_SECRET" => Some("from-env".to_string()),
                _ => None,
            });

        assert_eq!(
            config.nightscout.base_url.as_deref(),
            Some("https://env.example.org")
        );
        assert_eq!(config.nightscout.api_secret.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let config = Config::default()
            .with_nightscout_url("https://file.example.org")
            .with_env_overrides(|_| Some("  ".to_string()));

        assert_eq!(
            config.nightscout.base_url.as_deref(),
            Some("https://file.example.org")
        );
    }
}
