//! Configuration module
//!
//! Loaded once at startup from a TOML file
//! (default `~/.config/charger-monitor/config.toml`). Every field has a
//! default, so a partial or absent file still yields a working setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::PollerConfig;
use crate::domain::charger::{FleetRegistry, DEFAULT_CHARGERS};
use crate::infrastructure::DatabaseConfig;
use crate::shared::errors::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://api-v1-blue.chargelab.io/core/v1/chargers";

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("charger-monitor")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub monitor: MonitorSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub metrics: MetricsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSection {
    /// Status endpoint; the charger filter is appended as a query parameter
    pub api_base_url: String,
    /// Polled in this order
    pub chargers: Vec<String>,
    pub interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            chargers: DEFAULT_CHARGERS.iter().map(|c| c.to_string()).collect(),
            interval_secs: 117,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SQLite file, relative to the working directory
    pub path: String,
    /// Full connection URL; takes precedence over `path`
    pub url: Option<String>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: "chargelab_data.db".to_string(),
            url: None,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => DatabaseConfig::sqlite(&self.path).url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSection {
    /// Serve Prometheus metrics over HTTP
    pub enabled: bool,
    pub listen: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: false,
            listen: "0.0.0.0:9184".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|error| ConfigError::CouldNotRead {
            path: path.to_path_buf(),
            error,
        })?;
        toml::from_str::<Self>(&raw).map_err(|error| ConfigError::InvalidToml {
            path: path.to_path_buf(),
            error,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let monitor = &self.monitor;
        if monitor.chargers.is_empty() {
            return Err(ConfigError::Invalid("monitor.chargers is empty".to_string()));
        }
        if let Some(blank) = monitor.chargers.iter().position(|c| c.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "monitor.chargers[{}] is blank",
                blank
            )));
        }
        if monitor.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "monitor.interval_secs must be positive".to_string(),
            ));
        }
        if monitor.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "monitor.request_timeout_secs must be positive".to_string(),
            ));
        }
        reqwest::Url::parse(&monitor.api_base_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "monitor.api_base_url '{}': {}",
                monitor.api_base_url, e
            ))
        })?;
        if self.metrics.enabled {
            self.metrics_addr()?;
        }
        Ok(())
    }

    pub fn registry(&self) -> FleetRegistry {
        FleetRegistry::new(self.monitor.chargers.iter().cloned())
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_secs(self.monitor.interval_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.monitor.request_timeout_secs)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.connection_url(),
        }
    }

    pub fn metrics_addr(&self) -> Result<std::net::SocketAddr, ConfigError> {
        self.metrics.listen.parse().map_err(|e| {
            ConfigError::Invalid(format!("metrics.listen '{}': {}", self.metrics.listen, e))
        })
    }
}
