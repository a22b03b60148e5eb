use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{ConfigError, Result};

pub const DEFAULT_FEED_URL: &str = "http://distrowatch.com/news/dwd.xml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_feeds")]
    pub feeds: Vec<String>,

    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,

    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    #[serde(default)]
    pub settings: TransportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How feeds are fetched. Passed to the fetcher explicitly; the process
/// environment (`http_proxy` and friends) is only consulted when `use_proxy`
/// is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub use_proxy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub log_to_file: bool,

    #[serde(default = "default_log_file")]
    pub log_file: String,

    #[serde(default)]
    pub json_format: bool,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::NotFound(path.as_ref().display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration for a run: an explicit path must exist,
    /// otherwise the per-user config file is used if present, falling back to
    /// the built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_with_env(path);
        }

        if let Ok(path) = Self::default_path() {
            if path.exists() {
                tracing::debug!("Using configuration file {}", path.display());
                return Self::load_with_env(path);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for url in &self.feeds {
            let parsed = url::Url::parse(url)
                .map_err(|_| ConfigError::InvalidUrl(url.clone()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl(format!("Unsupported scheme: {}", url)));
            }
        }

        if self.platforms.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Config("Platform patterns cannot be empty".to_string()));
        }

        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::Config("Store path cannot be empty".to_string()));
        }

        if self.settings.timeout == 0 {
            return Err(ConfigError::Config("Timeout must be greater than 0".to_string()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `RELEASE_WATCH_*` overrides read through `lookup`. A timeout
    /// that is not a whole number of seconds is rejected.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(store) = lookup("RELEASE_WATCH_STORE") {
            self.store_path = PathBuf::from(store);
        }

        if let Some(level) = lookup("RELEASE_WATCH_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(timeout) = lookup("RELEASE_WATCH_TIMEOUT") {
            self.settings.timeout = timeout.trim().parse().map_err(|_| {
                ConfigError::Config(format!("RELEASE_WATCH_TIMEOUT must be a number of seconds, got '{}'", timeout))
            })?;
        }

        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("release-watch"))
            .ok_or_else(|| ConfigError::Invalid("Could not determine config directory".to_string()))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            platforms: default_platforms(),
            store_path: default_store_path(),
            settings: TransportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            use_proxy: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_to_file: false,
            log_file: default_log_file(),
            json_format: false,
        }
    }
}

fn default_feeds() -> Vec<String> {
    vec![DEFAULT_FEED_URL.to_string()]
}
fn default_platforms() -> Vec<String> {
    ["centos", "red hat", "rhel", "oel", "ubuntu", "suse", "arch"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}
fn default_store_path() -> PathBuf { PathBuf::from("distro_data.json") }
fn default_timeout() -> u64 { 30 }
fn default_user_agent() -> String {
    format!("release-watch/{}", env!("CARGO_PKG_VERSION"))
}
fn default_log_level() -> String { "info".to_string() }
fn default_log_file() -> String { "logs/release-watch.log".to_string() }
