//! # Unit-Work Kernel - Provider Implementations
//!
//! This crate contains the session providers. Each provider implements the
//! ports (traits) defined in `uwk-domain`.
//!
//! | Provider | Port | Purpose |
//! |----------|------|---------|
//! | Postgres | `SessionFactory`/`DatabaseSession` | Production sessions over a sqlx pool |
//! | Null | `SessionFactory`/`DatabaseSession` | Instrumented in-memory sessions for tests |

// Re-export uwk-domain types commonly used with providers
pub use uwk_domain::error::{Error, Result};
pub use uwk_domain::ports::session::{DatabaseSession, SessionFactory};

/// Instrumented no-op session provider for tests
pub mod null;

/// Postgres session provider backed by sqlx
pub mod postgres;

pub use null::{NullSession, NullSessionFactory, SessionStats};
pub use postgres::{PostgresSession, PostgresSessionFactory};
