//! Structured logging with tracing
//!
//! Centralized logging initialization for kernel-based applications,
//! configured from [`LoggingConfig`].

use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

pub use crate::config::LoggingConfig;
use uwk_domain::error::{Error, Result};

/// Environment variable overriding the configured filter
pub const LOG_FILTER_ENV: &str = "UWK_LOG";

/// Initialize logging with the provided configuration
///
/// Safe to call more than once; later calls are no-ops (relevant in
/// tests, where many entry points initialize eagerly).
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level));

    let initialized = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };

    if initialized.is_ok() {
        info!("logging initialized with level: {}", level);
    }
    Ok(())
}

/// Parse a log level string to a tracing `Level`
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "invalid log level: {level}; use trace, debug, info, warn or error"
        ))),
    }
}
