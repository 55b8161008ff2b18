//! Execution context store
//!
//! Task-local storage for the session bound to the current unit of work
//! and the transaction nesting depth. Each [`ExecutionScope`] is one
//! isolated unit: a binding made inside one scope is never observable
//! from a sibling task or a sibling scope, including when tasks
//! interleave on a shared worker pool.
//!
//! Bindings form a stack so that unit-unaware code may bind again and
//! restore the outer binding afterwards via the token returned by
//! [`bind`]. The `RefCell` borrow is confined to non-async accessors and
//! is never held across an await point.

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;

use uwk_domain::error::{Error, Result};
use uwk_domain::ports::session::DatabaseSession;

tokio::task_local! {
    static UNIT: RefCell<UnitContext>;
}

/// Per-unit state: the binding stack plus the transaction nesting depth
#[derive(Default)]
struct UnitContext {
    bindings: Vec<Arc<dyn DatabaseSession>>,
    depth: u32,
}

/// One unit of concurrent execution
///
/// Everything that binds or reads a session must run inside
/// `ExecutionScope::run`; the unit-of-work helpers in [`crate::scope`]
/// establish one automatically.
pub struct ExecutionScope;

impl ExecutionScope {
    /// Run `fut` inside a fresh execution unit
    ///
    /// Bindings and nesting depth are dropped when the future completes
    /// or is cancelled; nothing leaks into a subsequent unit. Nested
    /// calls shadow the outer unit for the duration of the inner future.
    pub async fn run<F>(fut: F) -> F::Output
    where
        F: Future,
    {
        UNIT.scope(RefCell::new(UnitContext::default()), fut).await
    }
}

/// Token returned by [`bind`], restoring the prior binding on [`unbind`]
///
/// Copyable so that an accidental second `unbind` stays a benign no-op
/// instead of corrupting the stack.
#[derive(Debug, Clone, Copy)]
pub struct BindToken {
    restore_height: usize,
}

/// Bind a session to the current execution unit
///
/// Returns a token capturing the prior binding (possibly none). Fails
/// with `InvalidArgument` when called outside any execution scope.
pub fn bind(session: Arc<dyn DatabaseSession>) -> Result<BindToken> {
    UNIT.try_with(|cell| {
        let mut unit = cell.borrow_mut();
        let token = BindToken {
            restore_height: unit.bindings.len(),
        };
        unit.bindings.push(session);
        token
    })
    .map_err(|_| {
        Error::invalid_argument(
            "no execution scope active; wrap the call in `ExecutionScope::run`, \
             `unit_of_work` or `session_scope`",
        )
    })
}

/// Return the session bound to the current execution unit
///
/// Fails with `NotBound` when no session is bound (or no scope is
/// active); the error message names the collaborators that should have
/// bound one.
pub fn current() -> Result<Arc<dyn DatabaseSession>> {
    UNIT.try_with(|cell| cell.borrow().bindings.last().cloned())
        .ok()
        .flatten()
        .ok_or(Error::NotBound)
}

/// Restore the binding that existed before the corresponding [`bind`]
///
/// Repeated calls with the same token are benign no-ops: the stack is
/// only ever truncated back to the token's recorded height.
pub fn unbind(token: BindToken) {
    let _ = UNIT.try_with(|cell| {
        let mut unit = cell.borrow_mut();
        if unit.bindings.len() > token.restore_height {
            unit.bindings.truncate(token.restore_height);
        }
    });
}

/// Whether the current execution unit has a session bound
pub fn is_bound() -> bool {
    UNIT.try_with(|cell| !cell.borrow().bindings.is_empty())
        .unwrap_or(false)
}

/// Read or mutate the nesting depth of the current unit
///
/// Crate-internal; only the transaction boundary accounts depth.
pub(crate) fn with_depth<R>(f: impl FnOnce(&mut u32) -> R) -> Result<R> {
    UNIT.try_with(|cell| f(&mut cell.borrow_mut().depth))
        .map_err(|_| Error::NotBound)
}
