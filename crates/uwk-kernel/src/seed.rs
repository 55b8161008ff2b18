//! Seed runner
//!
//! Runs explicitly registered seed tasks (bootstrap data, fixtures)
//! through the kernel's unit-of-work machinery: each seed gets its own
//! session and transaction, or all seeds share one transaction. Inside a
//! seed the bound session is reachable the usual way, so repositories
//! and services work unchanged.
//!
//! Seeds are registered in code; there is no on-disk script discovery.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, error, info};

use crate::{context, scope, tx};
use uwk_domain::error::Result;
use uwk_domain::ports::session::SessionFactory;

type SeedFuture = BoxFuture<'static, Result<()>>;

struct Seed {
    name: &'static str,
    run: Box<dyn Fn() -> SeedFuture + Send + Sync>,
}

/// Outcome summary of a seed run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Seeds that committed
    pub applied: usize,
    /// Seeds that failed and rolled back
    pub failed: usize,
}

/// Runs registered seeds against one session factory
pub struct SeedRunner {
    factory: Arc<dyn SessionFactory>,
    seeds: Vec<Seed>,
}

impl SeedRunner {
    /// Create a runner for the given factory
    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            factory,
            seeds: Vec::new(),
        }
    }

    /// Register a named seed
    pub fn register<F, Fut>(&mut self, name: &'static str, seed: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.seeds.push(Seed {
            name,
            run: Box::new(move || Box::pin(seed())),
        });
        self
    }

    /// Number of registered seeds
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Whether no seeds are registered
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Run every seed in its own unit of work and transaction
    ///
    /// A failed seed rolls back and is reported; remaining seeds still
    /// run. The report tallies both outcomes.
    pub async fn run_all(&self) -> SeedReport {
        let mut report = SeedReport::default();
        for seed in &self.seeds {
            info!(seed = seed.name, "running seed in isolated transaction");
            let outcome = scope::unit_of_work_with(Arc::clone(&self.factory), async {
                probe_connectivity().await?;
                tx::transactional((seed.run)()).await
            })
            .await;
            match outcome {
                Ok(()) => {
                    info!(seed = seed.name, "seed completed");
                    report.applied += 1;
                }
                Err(e) => {
                    error!(seed = seed.name, error = %e, "seed failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Run every seed inside one shared unit of work and transaction
    ///
    /// The first failure aborts the run and rolls back everything.
    pub async fn run_all_shared(&self) -> Result<()> {
        info!(count = self.seeds.len(), "running seeds in shared transaction");
        scope::unit_of_work_with(Arc::clone(&self.factory), async {
            tx::transactional(async {
                probe_connectivity().await?;
                for seed in &self.seeds {
                    info!(seed = seed.name, "running seed");
                    (seed.run)().await?;
                    info!(seed = seed.name, "seed done");
                }
                Ok(())
            })
            .await
        })
        .await
    }
}

/// Cheap connectivity check through the bound session before seeding
async fn probe_connectivity() -> Result<()> {
    let session = context::current()?;
    session.fetch_scalar("SELECT 1").await?;
    debug!(backend = session.backend_name(), "database connectivity ok");
    Ok(())
}
