//! # Unit-Work Kernel
//!
//! Per-request unit-of-work coordinator: binds one database session to the
//! current logical unit of execution (an HTTP request, a background job, a
//! seed script, a test), makes it reachable from arbitrarily deep call
//! stacks without parameter passing, and enforces transactional boundaries
//! that nest correctly.
//!
//! ## Architecture
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`context`] | Task-scoped session binding (the execution context store) |
//! | [`registry`] | Kind → factory resolution registry |
//! | [`wire`] | Auto-wiring of declared dependency slots |
//! | [`tx`] | Reentrant transaction boundary |
//! | [`engine`] | Process-wide session factory lifecycle |
//! | [`scope`] | Unit-of-work entry points (request and standalone) |
//! | [`seed`] | Seed runner for bootstrap scripts |
//!
//! ## Usage
//!
//! ```ignore
//! use uwk_kernel::{scope, tx, context};
//!
//! // request middleware wraps the handler:
//! scope::unit_of_work(async {
//!     tx::transactional(async {
//!         let session = context::current()?;
//!         session.execute("INSERT INTO users (name) VALUES ('Alice')").await?;
//!         Ok(())
//!     })
//!     .await
//! })
//! .await?;
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod logging;
pub mod registry;
pub mod scope;
pub mod seed;
pub mod testing;
pub mod tx;
pub mod wire;

// Re-export the shared error surface
pub use uwk_domain::error::{Error, Result};
pub use uwk_domain::ports::session::{DatabaseSession, SessionFactory};

pub use context::{bind, current, is_bound, unbind, BindToken, ExecutionScope};
pub use scope::{healthcheck, session_scope, unit_of_work};
pub use tx::{transactional, Outcome};
pub use wire::{wire, Slot, WireSlot, Wireable};
