//! Tests for the seed runner

use std::sync::Arc;

use uwk_kernel::seed::{SeedReport, SeedRunner};
use uwk_kernel::{context, Error, SessionFactory};
use uwk_providers::null::NullSessionFactory;

#[tokio::test]
async fn isolated_seeds_get_one_transaction_each() {
    let factory = Arc::new(NullSessionFactory::new());
    let mut runner = SeedRunner::new(Arc::clone(&factory) as Arc<dyn SessionFactory>);
    runner
        .register("seed_users", || async {
            context::current()?
                .execute("INSERT INTO users (name) VALUES ('Alice')")
                .await?;
            Ok(())
        })
        .register("seed_pets", || async {
            context::current()?
                .execute("INSERT INTO pets (name) VALUES ('Rex')")
                .await?;
            Ok(())
        });

    let report = runner.run_all().await;
    assert_eq!(
        report,
        SeedReport {
            applied: 2,
            failed: 0
        }
    );

    let sessions = factory.sessions();
    assert_eq!(sessions.len(), 2);
    for stats in &sessions {
        assert_eq!(stats.begins(), 1);
        assert_eq!(stats.commits(), 1);
        assert_eq!(stats.closes(), 1);
    }
}

#[tokio::test]
async fn failed_seed_rolls_back_but_does_not_stop_the_rest() {
    let factory = Arc::new(NullSessionFactory::new());
    let mut runner = SeedRunner::new(Arc::clone(&factory) as Arc<dyn SessionFactory>);
    runner
        .register("seed_broken", || async {
            Err(Error::database("duplicate key"))
        })
        .register("seed_pets", || async {
            context::current()?
                .execute("INSERT INTO pets (name) VALUES ('Rex')")
                .await?;
            Ok(())
        });

    let report = runner.run_all().await;
    assert_eq!(
        report,
        SeedReport {
            applied: 1,
            failed: 1
        }
    );

    let sessions = factory.sessions();
    assert_eq!(sessions[0].rollbacks(), 1);
    assert_eq!(sessions[0].commits(), 0);
    assert_eq!(sessions[1].commits(), 1);
}

#[tokio::test]
async fn shared_mode_uses_one_transaction_for_all_seeds() {
    let factory = Arc::new(NullSessionFactory::new());
    let mut runner = SeedRunner::new(Arc::clone(&factory) as Arc<dyn SessionFactory>);
    runner
        .register("seed_users", || async {
            context::current()?
                .execute("INSERT INTO users (name) VALUES ('Alice')")
                .await?;
            Ok(())
        })
        .register("seed_pets", || async {
            context::current()?
                .execute("INSERT INTO pets (name) VALUES ('Rex')")
                .await?;
            Ok(())
        });

    runner.run_all_shared().await.unwrap();

    let sessions = factory.sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].begins(), 1);
    assert_eq!(sessions[0].commits(), 1);
}

#[tokio::test]
async fn shared_mode_failure_rolls_back_everything() {
    let factory = Arc::new(NullSessionFactory::new());
    let mut runner = SeedRunner::new(Arc::clone(&factory) as Arc<dyn SessionFactory>);
    runner
        .register("seed_users", || async {
            context::current()?
                .execute("INSERT INTO users (name) VALUES ('Alice')")
                .await?;
            Ok(())
        })
        .register("seed_broken", || async {
            Err(Error::database("duplicate key"))
        });

    let err = runner.run_all_shared().await.unwrap_err();
    assert!(matches!(err, Error::Database { .. }));

    let stats = factory.last_session().unwrap();
    assert_eq!(stats.commits(), 0);
    assert_eq!(stats.rollbacks(), 1);
}

#[tokio::test]
async fn empty_runner_reports_nothing() {
    let factory = Arc::new(NullSessionFactory::new());
    let runner = SeedRunner::new(factory);
    assert!(runner.is_empty());
    assert_eq!(runner.run_all().await, SeedReport::default());
}
