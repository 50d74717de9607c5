//! Configuration management for the crawler.
//!
//! Loads, saves and validates the TOML configuration from the
//! platform-specific config directory. Flags that change per run live on
//! the command line; everything about how the site is talked to lives here.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application name used for config directory.
const APP_NAME: &str = "tululu-crawler";

/// Default config filename.
const CONFIG_FILENAME: &str = "config.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The site being crawled.
    pub site: SiteConfig,

    /// HTTP transport settings.
    pub http: HttpConfig,

    /// Adaptive backoff applied after connection failures.
    pub backoff: BackoffConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            http: HttpConfig::default(),
            backoff: BackoffConfig::default(),
        }
    }
}

/// Site addressing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root URL of the library site. Listing pages, the text-download
    /// endpoint and root-relative image paths are all resolved against it.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://tululu.org".to_string(),
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Total per-request timeout in seconds.
    pub timeout_sec: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_sec: u64,

    /// Whether to verify TLS certificates. The site has served a broken
    /// certificate chain for years, so this defaults to off.
    pub verify_tls: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            timeout_sec: 30,
            connect_timeout_sec: 10,
            verify_tls: false,
        }
    }
}

/// Backoff configuration for connection failures.
///
/// The delay starts at `initial_delay_sec`, grows by `step_sec` after every
/// connection failure and never exceeds `max_delay_sec`. It is never reset
/// within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Delay slept after the first connection failure, in seconds.
    pub initial_delay_sec: u64,

    /// Added to the delay after each connection failure, in seconds.
    pub step_sec: u64,

    /// Upper bound on the delay, in seconds.
    pub max_delay_sec: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay_sec: 10,
            step_sec: 5,
            max_delay_sec: 180,
        }
    }
}

impl Config {
    /// Returns the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILENAME))
    }

    /// Loads configuration from the default location.
    ///
    /// If the config file doesn't exist, creates a default one.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if url::Url::parse(&self.site.base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "site.base_url".to_string(),
                message: "must be an absolute URL".to_string(),
            });
        }

        if self.http.timeout_sec == 0 {
            return Err(ConfigError::InvalidValue {
                key: "http.timeout_sec".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        if self.backoff.max_delay_sec < self.backoff.initial_delay_sec {
            return Err(ConfigError::InvalidValue {
                key: "backoff.max_delay_sec".to_string(),
                message: "must not be smaller than initial_delay_sec".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site.base_url, "http://tululu.org");
        assert_eq!(config.backoff.initial_delay_sec, 10);
        assert_eq!(config.backoff.step_sec, 5);
        assert_eq!(config.backoff.max_delay_sec, 180);
        assert!(!config.http.verify_tls);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config::default();
        let file = NamedTempFile::new().unwrap();

        config.save_to(file.path()).unwrap();

        let loaded = Config::load_from(file.path()).unwrap();
        assert_eq!(loaded.site.base_url, config.site.base_url);
        assert_eq!(loaded.http.timeout_sec, config.http.timeout_sec);
        assert_eq!(loaded.backoff.max_delay_sec, config.backoff.max_delay_sec);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.site.base_url, "http://tululu.org");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.timeout_sec = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.backoff.initial_delay_sec = 200;
        assert!(config.validate().is_err());
    }
}
