//! Port traits implemented by session providers

pub mod session;

pub use session::{DatabaseSession, SessionFactory};
