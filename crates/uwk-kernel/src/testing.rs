//! Test helpers for kernel-based applications
//!
//! The null session factory plus one convenience wrapper, so application
//! tests can exercise services and repositories end to end and then
//! assert exactly what happened to the session.
//!
//! ```ignore
//! use uwk_kernel::testing::with_null_session;
//!
//! let (result, factory) = with_null_session(async {
//!     UsersRepo::new().create("Alice").await
//! })
//! .await;
//! result.unwrap();
//! let stats = factory.last_session().unwrap();
//! assert_eq!(stats.commits(), 0); // no transactional wrapper, no commit
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::scope;
use uwk_domain::error::Result;
use uwk_domain::ports::session::SessionFactory;
pub use uwk_providers::null::{NullSession, NullSessionFactory, SessionStats};

/// Run `fut` as a unit of work against a fresh null factory
///
/// Returns the body's result along with the factory, whose recorded
/// session stats survive the unit for assertions.
pub async fn with_null_session<T, Fut>(fut: Fut) -> (Result<T>, Arc<NullSessionFactory>)
where
    Fut: Future<Output = Result<T>>,
{
    let factory = Arc::new(NullSessionFactory::new());
    let result =
        scope::unit_of_work_with(Arc::clone(&factory) as Arc<dyn SessionFactory>, fut).await;
    (result, factory)
}
