//! Transaction boundary
//!
//! A reentrant scope over the session bound to the current execution
//! unit. The first [`enter`] within a unit opens a real database
//! transaction; nested entries only join it. The matching outermost
//! [`exit`] commits or rolls back exactly once; the outcome of an inner
//! scope never independently ends the transaction.
//!
//! Services compose the boundary explicitly: a public operation wraps
//! its body in [`transactional`] as its first statement. Operations that
//! must not open a transaction (pure reads, health probes) simply do not
//! wrap.

use std::future::Future;

use tracing::{trace, warn};

use crate::context;
use uwk_domain::error::{Error, Result};

/// Outcome reported when leaving a transactional scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Commit at the outermost exit
    Success,
    /// Roll back at the outermost exit
    Failure,
}

/// Enter a transactional scope on the current unit's session
///
/// Depth 0→1 issues `BEGIN` on the bound session; deeper entries only
/// increment the depth. Fails with `NotBound` when no session is bound.
/// If `BEGIN` itself fails, the depth is left untouched.
pub async fn enter() -> Result<()> {
    let session = context::current()?;
    let depth = context::with_depth(|d| *d)?;
    if depth == 0 {
        session.begin().await?;
    }
    context::with_depth(|d| *d += 1)?;
    trace!(depth = depth + 1, "transaction scope entered");
    Ok(())
}

/// Leave a transactional scope
///
/// Decrements the depth; the 1→0 transition is the real boundary and
/// commits on [`Outcome::Success`], rolls back on [`Outcome::Failure`].
/// Calling `exit` with no open scope is an `InvalidArgument` error.
pub async fn exit(outcome: Outcome) -> Result<()> {
    let depth = context::with_depth(|d| *d)?;
    if depth == 0 {
        return Err(Error::invalid_argument(
            "transaction exit without a matching enter",
        ));
    }
    context::with_depth(|d| *d -= 1)?;
    trace!(depth = depth - 1, ?outcome, "transaction scope exited");
    if depth > 1 {
        return Ok(());
    }
    let session = context::current()?;
    match outcome {
        Outcome::Success => session.commit().await,
        Outcome::Failure => session.rollback().await,
    }
}

/// Current nesting depth of the unit's transaction boundary
///
/// Zero outside any scope (or outside any execution unit).
pub fn depth() -> u32 {
    context::with_depth(|d| *d).unwrap_or(0)
}

/// Run `fut` inside one transactional scope
///
/// On success the scope exits with [`Outcome::Success`]; a commit
/// failure at the outermost depth surfaces as a `Transaction` error. On
/// failure the scope exits with [`Outcome::Failure`] and the original
/// error propagates unchanged: inner nested scopes never swallow or
/// convert it, and the single rollback happens at the outermost exit.
pub async fn transactional<T, Fut>(fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    enter().await?;
    match fut.await {
        Ok(value) => {
            exit(Outcome::Success).await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(exit_err) = exit(Outcome::Failure).await {
                // Keep the body's error; the rollback problem is secondary.
                warn!(error = %exit_err, "rollback on failure path also failed");
            }
            Err(err)
        }
    }
}
