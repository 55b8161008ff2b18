//! Domain Layer - Unit-Work Kernel
//!
//! This crate contains the core contracts of the unit-work kernel:
//! the error taxonomy shared by every layer and the port traits that
//! session providers implement.
//!
//! ## Dependencies
//!
//! This crate depends only on pure libraries (`thiserror`, `async-trait`);
//! it has no knowledge of any concrete database driver or runtime wiring.

pub mod error;
pub mod ports;

pub use error::{Error, Result};
pub use ports::session::{DatabaseSession, SessionFactory};
