//! Configuration types and loader
//!
//! Kernel configuration is one connection string plus pool and logging
//! knobs. Sources merge in this order (later overrides earlier):
//! defaults → TOML file → `UWK_*` environment variables, with a bare
//! `DATABASE_URL` honored as a fallback for the connection string.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use uwk_domain::error::{Error, Result};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILENAME: &str = "uwk.toml";

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "UWK";

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name, used in diagnostics
    pub name: String,
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "uwk-app".to_string(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL; `postgresql://` is accepted as an alias of
    /// `postgres://`
    pub url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before failing
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 5,
            acquire_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    /// Acquire timeout as a `Duration`
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON-structured lines instead of human-readable ones
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        let path = self
            .config_path
            .clone()
            .or_else(|| Self::find_default_config_path());
        if let Some(path) = path {
            if path.exists() {
                debug!(path = %path.display(), "loading configuration file");
                figment = figment.merge(Toml::file(&path));
            }
        }

        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("_"));

        let mut config: AppConfig = figment
            .extract()
            .map_err(|e| Error::configuration_with_source("failed to extract configuration", e))?;

        // Bare DATABASE_URL keeps working the way seed scripts expect.
        if config.database.url.is_empty() {
            if let Ok(url) = env::var("DATABASE_URL") {
                config.database.url = url;
            }
        }

        self.validate(&config)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let rendered = toml::to_string_pretty(config)
            .map_err(|e| Error::configuration_with_source("failed to serialize config", e))?;
        std::fs::write(path.as_ref(), rendered)
            .map_err(|e| Error::configuration_with_source("failed to write config file", e))?;
        Ok(())
    }

    fn validate(&self, config: &AppConfig) -> Result<()> {
        if config.database.max_connections == 0 {
            return Err(Error::configuration(
                "database.max_connections must be at least 1",
            ));
        }
        if config.database.acquire_timeout_secs == 0 {
            return Err(Error::configuration(
                "database.acquire_timeout_secs must be at least 1",
            ));
        }
        Ok(())
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;
        let candidate = current_dir.join(DEFAULT_CONFIG_FILENAME);
        candidate.exists().then_some(candidate)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
