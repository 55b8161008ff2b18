//! Unit-of-work entry points
//!
//! The session lifecycle manager. [`unit_of_work`] is what a request
//! middleware wraps around each handler; [`session_scope`] is the
//! standalone variant for CLI tools, jobs and tests, which transparently
//! reuses a session already bound by an outer caller.
//!
//! Either way the guarantee is the same: the session is bound before the
//! body runs and is unbound and released on every exit path. When the
//! body's future is cancelled mid-flight, the execution scope unwinds
//! with it and the dropped session rolls back whatever was in flight
//! (provider drop semantics).

use std::future::Future;
use std::sync::Arc;

use tracing::{debug_span, warn, Instrument};
use uuid::Uuid;

use crate::{context, engine};
use uwk_domain::error::Result;
use uwk_domain::ports::session::SessionFactory;

/// Run one request-style unit of work against the process-wide factory
pub async fn unit_of_work<T, Fut>(fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    unit_of_work_with(engine::factory()?, fut).await
}

/// Run one request-style unit of work against an explicit factory
///
/// Opens a session, binds it to a fresh execution unit, runs the body,
/// then unbinds and closes. The body's result passes through unchanged.
/// On failure a best-effort rollback runs first, a no-op when the
/// transaction boundary already rolled back, and the safety net when a
/// failure escaped before any transactional operation ran. The manager
/// never commits; that is the transaction boundary's job alone.
pub async fn unit_of_work_with<T, Fut>(factory: Arc<dyn SessionFactory>, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    let span = debug_span!(
        "unit_of_work",
        unit = %Uuid::new_v4(),
        backend = factory.backend_name()
    );
    context::ExecutionScope::run(async move {
        let session = factory.open_session().await?;
        let token = context::bind(Arc::clone(&session))?;
        let result = fut.await;
        if result.is_err() {
            if let Err(e) = session.rollback().await {
                warn!(error = %e, "best-effort rollback failed");
            }
        }
        context::unbind(token);
        if let Err(e) = session.close().await {
            warn!(error = %e, "session close failed");
        }
        result
    })
    .instrument(span)
    .await
}

/// Run a standalone unit, reusing an already-bound session when present
///
/// Nested calls from inside a request reuse the request's session
/// transparently instead of opening a second one; otherwise this behaves
/// like [`unit_of_work`] against the process-wide factory.
pub async fn session_scope<T, Fut>(fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    if context::is_bound() {
        return fut.await;
    }
    unit_of_work_with(engine::factory()?, fut).await
}

/// [`session_scope`] against an explicit factory
pub async fn session_scope_with<T, Fut>(factory: Arc<dyn SessionFactory>, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    if context::is_bound() {
        return fut.await;
    }
    unit_of_work_with(factory, fut).await
}

/// Verify database connectivity through a standalone scope
pub async fn healthcheck() -> Result<()> {
    session_scope(async {
        context::current()?.fetch_scalar("SELECT 1").await?;
        Ok(())
    })
    .await
}
