//! Tests for the transaction boundary
//!
//! Nesting idempotence, rollback-on-failure and the failure paths of
//! enter/exit accounting, all against instrumented null sessions.

use std::sync::Arc;

use uwk_kernel::context::{bind, ExecutionScope};
use uwk_kernel::tx::{self, transactional, Outcome};
use uwk_kernel::{DatabaseSession as _, Error};
use uwk_providers::null::NullSession;

#[tokio::test]
async fn enter_without_bound_session_reports_not_bound() {
    ExecutionScope::run(async {
        assert!(matches!(tx::enter().await, Err(Error::NotBound)));
    })
    .await;
}

#[tokio::test]
async fn exit_without_enter_is_invalid_argument() {
    ExecutionScope::run(async {
        let session = NullSession::new();
        bind(Arc::new(session)).unwrap();
        let err = tx::exit(Outcome::Success).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    })
    .await;
}

#[tokio::test]
async fn n_enters_and_exits_open_and_commit_exactly_once() {
    ExecutionScope::run(async {
        let session = NullSession::new();
        let stats = session.stats();
        bind(Arc::new(session)).unwrap();

        for _ in 0..5 {
            tx::enter().await.unwrap();
        }
        assert_eq!(tx::depth(), 5);
        for _ in 0..5 {
            tx::exit(Outcome::Success).await.unwrap();
        }

        assert_eq!(tx::depth(), 0);
        assert_eq!(stats.begins(), 1);
        assert_eq!(stats.commits(), 1);
        assert_eq!(stats.rollbacks(), 0);
    })
    .await;
}

#[tokio::test]
async fn inner_failure_outcome_does_not_end_the_transaction() {
    ExecutionScope::run(async {
        let session = NullSession::new();
        let stats = session.stats();
        bind(Arc::new(session)).unwrap();

        tx::enter().await.unwrap();
        tx::enter().await.unwrap();
        // inner scope reports failure; nothing must happen yet
        tx::exit(Outcome::Failure).await.unwrap();
        assert_eq!(stats.rollbacks(), 0);
        // the outermost exit decides
        tx::exit(Outcome::Success).await.unwrap();

        assert_eq!(stats.commits(), 1);
        assert_eq!(stats.rollbacks(), 0);
    })
    .await;
}

#[tokio::test]
async fn transactional_commits_on_success() {
    ExecutionScope::run(async {
        let session = NullSession::new();
        let stats = session.stats();
        bind(Arc::new(session)).unwrap();

        let value = transactional(async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
        assert_eq!(stats.begins(), 1);
        assert_eq!(stats.commits(), 1);
    })
    .await;
}

#[tokio::test]
async fn transactional_rolls_back_and_repropagates_original_error() {
    ExecutionScope::run(async {
        let session = NullSession::new();
        let stats = session.stats();
        bind(Arc::new(session)).unwrap();

        let err = transactional::<(), _>(async {
            Err(Error::invalid_argument("name must not be empty"))
        })
        .await
        .unwrap_err();

        // same kind and message, not a converted wrapper
        match err {
            Error::InvalidArgument { message } => assert_eq!(message, "name must not be empty"),
            other => panic!("expected InvalidArgument, got {other}"),
        }
        assert_eq!(stats.commits(), 0);
        assert_eq!(stats.rollbacks(), 1);
        assert_eq!(tx::depth(), 0);
    })
    .await;
}

#[tokio::test]
async fn nested_transactional_rolls_back_exactly_once() {
    ExecutionScope::run(async {
        let session = NullSession::new();
        let stats = session.stats();
        bind(Arc::new(session)).unwrap();

        let err = transactional::<(), _>(async {
            transactional::<(), _>(async {
                Err(Error::database("inner operation rejected"))
            })
            .await
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Database { .. }));
        assert_eq!(stats.begins(), 1);
        assert_eq!(stats.commits(), 0);
        assert_eq!(stats.rollbacks(), 1);
    })
    .await;
}

#[tokio::test]
async fn commit_failure_surfaces_as_transaction_error() {
    use uwk_providers::null::NullSessionFactory;
    use uwk_providers::SessionFactory as _;

    ExecutionScope::run(async {
        let factory = NullSessionFactory::failing_commit();
        let session = factory.open_session().await.unwrap();
        bind(session).unwrap();

        let err = transactional(async { Ok(()) }).await.unwrap_err();
        assert!(matches!(err, Error::Transaction { .. }));
    })
    .await;
}

#[tokio::test]
async fn failed_begin_leaves_depth_untouched() {
    ExecutionScope::run(async {
        let session = Arc::new(NullSession::new());
        // open a transaction behind the boundary's back, so BEGIN fails
        session.begin().await.unwrap();
        bind(session).unwrap();

        assert!(tx::enter().await.is_err());
        assert_eq!(tx::depth(), 0);
    })
    .await;
}
