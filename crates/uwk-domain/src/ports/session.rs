//! Database Session Port
//!
//! Port for database session providers. The kernel coordinates sessions
//! purely through these traits; query construction against a schema is a
//! concern of the application built on top, not of the kernel.
//!
//! A [`DatabaseSession`] is one logical connection/transaction context.
//! It is owned by exactly one unit of work at a time and must never be
//! shared concurrently across units; the kernel's context store enforces
//! that ownership.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// One logical database session bound to a unit of work
///
/// Methods take `&self`; implementations use interior mutability because
/// the session travels through the context store as `Arc<dyn DatabaseSession>`.
#[async_trait]
pub trait DatabaseSession: Send + Sync {
    /// Begin a transaction on this session
    ///
    /// Called by the transaction boundary on the 0→1 depth transition only;
    /// a session has at most one transaction open at a time.
    async fn begin(&self) -> Result<()>;

    /// Commit the open transaction
    ///
    /// Committing with no open transaction is a no-op, mirroring what a
    /// bare `COMMIT` does on a real connection.
    async fn commit(&self) -> Result<()>;

    /// Roll back the open transaction (no-op when none is open)
    async fn rollback(&self) -> Result<()>;

    /// Execute a statement, returning the number of affected rows
    ///
    /// Routes through the open transaction when one exists.
    async fn execute(&self, sql: &str) -> Result<u64>;

    /// Execute a query and return the first column of the first row, if any
    ///
    /// The kernel itself only needs this for connectivity probes; richer
    /// result mapping belongs to the application layer.
    async fn fetch_scalar(&self, sql: &str) -> Result<Option<String>>;

    /// Release the session back to its factory/pool
    ///
    /// An open transaction is rolled back as part of release.
    async fn close(&self) -> Result<()>;

    /// Backend name for diagnostics (e.g. "postgres", "null")
    fn backend_name(&self) -> &str;
}

/// Factory producing sessions for units of work
///
/// One factory is shared by all units in a process; it must be safe to
/// call from many tasks concurrently.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open a fresh session for one unit of work
    async fn open_session(&self) -> Result<Arc<dyn DatabaseSession>>;

    /// Release pooled resources; called at most once, at shutdown
    async fn dispose(&self) -> Result<()>;

    /// Backend name for diagnostics
    fn backend_name(&self) -> &str;
}
