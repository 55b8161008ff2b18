//! Postgres session provider
//!
//! Production implementation of the session ports over a `sqlx` connection
//! pool. One `PostgresSession` wraps at most one open `sqlx::Transaction`;
//! the kernel's transaction boundary guarantees begin/commit/rollback are
//! only issued at the outermost nesting depth.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, Postgres};
use sqlx::Row;
use tokio::sync::Mutex;
use tracing::debug;
use uwk_domain::error::{Error, Result};
use uwk_domain::ports::session::{DatabaseSession, SessionFactory};

/// Session factory backed by a shared `PgPool`
pub struct PostgresSessionFactory {
    pool: PgPool,
}

impl PostgresSessionFactory {
    /// Build a factory with a lazily-connecting pool
    ///
    /// Stale pooled connections are checked before reuse
    /// (`test_before_acquire`), so long-idle pools recover cleanly.
    pub fn connect_lazy(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .test_before_acquire(true)
            .connect_lazy(url)
            .map_err(|e| Error::configuration_with_source("invalid database URL", e))?;
        debug!(backend = "postgres", "session factory initialized");
        Ok(Self { pool })
    }

    /// Wrap an existing pool (e.g. one shared with a migration runner)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionFactory for PostgresSessionFactory {
    async fn open_session(&self) -> Result<Arc<dyn DatabaseSession>> {
        Ok(Arc::new(PostgresSession {
            pool: self.pool.clone(),
            tx: Mutex::new(None),
        }))
    }

    async fn dispose(&self) -> Result<()> {
        self.pool.close().await;
        debug!(backend = "postgres", "pool disposed");
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "postgres"
    }
}

/// One Postgres session, holding at most one open transaction
///
/// When no transaction is open, statements execute directly against the
/// pool (autocommit). A session dropped mid-transaction rolls back via
/// sqlx's `Transaction` drop behavior.
pub struct PostgresSession {
    pool: PgPool,
    tx: Mutex<Option<sqlx::Transaction<'static, Postgres>>>,
}

#[async_trait]
impl DatabaseSession for PostgresSession {
    async fn begin(&self) -> Result<()> {
        let mut guard = self.tx.lock().await;
        if guard.is_some() {
            return Err(Error::transaction(
                "a transaction is already open on this session",
            ));
        }
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::transaction_with_source("failed to begin transaction", e))?;
        *guard = Some(tx);
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let tx = self.tx.lock().await.take();
        match tx {
            Some(tx) => tx
                .commit()
                .await
                .map_err(|e| Error::transaction_with_source("commit failed", e)),
            None => Ok(()),
        }
    }

    async fn rollback(&self) -> Result<()> {
        let tx = self.tx.lock().await.take();
        match tx {
            Some(tx) => tx
                .rollback()
                .await
                .map_err(|e| Error::transaction_with_source("rollback failed", e)),
            None => Ok(()),
        }
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        let mut guard = self.tx.lock().await;
        let result = match guard.as_mut() {
            Some(tx) => sqlx::query(sql).execute(&mut **tx).await,
            None => sqlx::query(sql).execute(&self.pool).await,
        };
        result
            .map(|r| r.rows_affected())
            .map_err(|e| Error::database_with_source("statement execution failed", e))
    }

    async fn fetch_scalar(&self, sql: &str) -> Result<Option<String>> {
        let mut guard = self.tx.lock().await;
        let row = match guard.as_mut() {
            Some(tx) => sqlx::query(sql).fetch_optional(&mut **tx).await,
            None => sqlx::query(sql).fetch_optional(&self.pool).await,
        }
        .map_err(|e| Error::database_with_source("query execution failed", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        if let Ok(v) = row.try_get::<String, _>(0) {
            Ok(Some(v))
        } else if let Ok(v) = row.try_get::<i64, _>(0) {
            Ok(Some(v.to_string()))
        } else if let Ok(v) = row.try_get::<i32, _>(0) {
            Ok(Some(v.to_string()))
        } else {
            Err(Error::database("first column is not a text or integer scalar"))
        }
    }

    async fn close(&self) -> Result<()> {
        // Dropping an unfinished sqlx transaction rolls it back; dropping
        // the last pool handle for this session returns the connection.
        self.rollback().await
    }

    fn backend_name(&self) -> &str {
        "postgres"
    }
}
