//! Tests for the process-wide engine lifecycle
//!
//! The engine is global to the process, so its lifecycle is exercised in
//! a single sequential test; everything else in the suite uses explicit
//! factories.

use std::sync::Arc;

use uwk_kernel::scope::{healthcheck, session_scope, unit_of_work};
use uwk_kernel::{context, engine, transactional, SessionFactory};
use uwk_providers::null::NullSessionFactory;

#[tokio::test]
async fn engine_lifecycle_end_to_end() {
    // shutdown with nothing installed is a no-op
    engine::shutdown().await.unwrap();

    let null_factory = Arc::new(NullSessionFactory::new());
    engine::set_factory(Arc::clone(&null_factory) as Arc<dyn SessionFactory>);

    // the installed factory serves the global entry points
    let installed = engine::factory().unwrap();
    assert_eq!(installed.backend_name(), "null");

    healthcheck().await.unwrap();
    assert_eq!(
        null_factory.sessions()[0].statements(),
        vec!["SELECT 1".to_string()]
    );

    unit_of_work(async {
        transactional(async {
            context::current()?
                .execute("INSERT INTO users (name) VALUES ('Alice')")
                .await?;
            Ok(())
        })
        .await
    })
    .await
    .unwrap();
    assert_eq!(null_factory.sessions().len(), 2);
    assert_eq!(null_factory.last_session().unwrap().commits(), 1);

    // standalone scope with nothing bound opens its own session
    session_scope(async {
        assert!(context::is_bound());
        Ok(())
    })
    .await
    .unwrap();
    assert_eq!(null_factory.sessions().len(), 3);

    // dispose exactly once; repeated shutdown stays a no-op
    engine::shutdown().await.unwrap();
    assert!(null_factory.disposed());
    engine::shutdown().await.unwrap();
}
