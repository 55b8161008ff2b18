//! Session factory lifecycle
//!
//! Owns the one `SessionFactory` shared by every unit of work in the
//! process. The factory is built lazily from configuration on first use
//! (the pool itself connects lazily too), can be overridden explicitly
//! (tests, application lifespan hooks), and is disposed exactly once at
//! shutdown.

use std::sync::{Arc, LazyLock, Mutex};

use tracing::info;

use crate::config::{ConfigLoader, DatabaseConfig};
use uwk_domain::error::{Error, Result};
use uwk_domain::ports::session::SessionFactory;
use uwk_providers::postgres::PostgresSessionFactory;

static FACTORY: LazyLock<Mutex<Option<Arc<dyn SessionFactory>>>> =
    LazyLock::new(|| Mutex::new(None));

/// Normalize connection URL scheme aliases to the canonical form
///
/// The generic `postgresql://` scheme is treated as equivalent to
/// `postgres://`; anything else passes through untouched.
pub fn normalize_url(url: &str) -> Result<String> {
    if url.is_empty() {
        return Err(Error::invalid_argument("database URL must not be empty"));
    }
    if let Some(rest) = url.strip_prefix("postgresql://") {
        return Ok(format!("postgres://{rest}"));
    }
    Ok(url.to_string())
}

/// Build a Postgres factory from `config` and install it
///
/// Replaces any previously installed factory without disposing it; call
/// [`shutdown`] first when rebuilding at runtime.
pub fn init(config: &DatabaseConfig) -> Result<Arc<dyn SessionFactory>> {
    let url = normalize_url(&config.url)?;
    let factory: Arc<dyn SessionFactory> = Arc::new(PostgresSessionFactory::connect_lazy(
        &url,
        config.max_connections,
        config.acquire_timeout(),
    )?);
    set_factory(Arc::clone(&factory));
    info!(backend = factory.backend_name(), "session factory installed");
    Ok(factory)
}

/// Install a factory explicitly (test double, externally built pool)
pub fn set_factory(factory: Arc<dyn SessionFactory>) {
    *FACTORY.lock().unwrap_or_else(|e| e.into_inner()) = Some(factory);
}

/// Return the installed factory, building one from configuration when
/// none exists yet
///
/// Configuration comes from the standard loader (defaults → TOML file →
/// `UWK_*` environment), with a bare `DATABASE_URL` honored as fallback.
pub fn factory() -> Result<Arc<dyn SessionFactory>> {
    let mut guard = FACTORY.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(factory) = guard.as_ref() {
        return Ok(Arc::clone(factory));
    }
    let config = ConfigLoader::new().load()?;
    if config.database.url.is_empty() {
        return Err(Error::configuration(
            "no database URL configured; set DATABASE_URL or UWK_DATABASE_URL",
        ));
    }
    let url = normalize_url(&config.database.url)?;
    let factory: Arc<dyn SessionFactory> = Arc::new(PostgresSessionFactory::connect_lazy(
        &url,
        config.database.max_connections,
        config.database.acquire_timeout(),
    )?);
    *guard = Some(Arc::clone(&factory));
    info!(backend = factory.backend_name(), "session factory installed");
    Ok(factory)
}

/// Dispose the installed factory
///
/// Runs at most once per installed factory; a shutdown with nothing
/// installed is a no-op.
pub async fn shutdown() -> Result<()> {
    let taken = FACTORY.lock().unwrap_or_else(|e| e.into_inner()).take();
    if let Some(factory) = taken {
        factory.dispose().await?;
        info!("session factory disposed");
    }
    Ok(())
}
