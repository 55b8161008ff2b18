//! Null session provider for testing
//!
//! A session provider that talks to no database at all. Every operation
//! succeeds and is counted, so tests can assert exactly how many real
//! transactions a unit of work opened, committed or rolled back.
//!
//! Counter semantics follow real connection behavior: `commit`/`rollback`
//! with no open transaction are accepted as no-ops and not counted, and a
//! session dropped with an open transaction records a rollback (the way a
//! pooled connection rolls back when returned dirty).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uwk_domain::error::{Error, Result};
use uwk_domain::ports::session::{DatabaseSession, SessionFactory};

/// Observable counters for one null session
///
/// Held by `Arc` from both the session and its factory, so assertions
/// stay possible after the session itself has been released.
#[derive(Debug, Default)]
pub struct SessionStats {
    begins: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    closes: AtomicUsize,
    statements: Mutex<Vec<String>>,
}

impl SessionStats {
    /// Number of transactions opened
    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    /// Number of commits performed on an open transaction
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Number of rollbacks performed on an open transaction
    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    /// Number of times the session was closed
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Statements executed through the session, in order
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Null session that records operations instead of performing them
pub struct NullSession {
    stats: Arc<SessionStats>,
    tx_open: AtomicBool,
    fail_commit: bool,
}

impl NullSession {
    /// Create a detached null session with fresh stats
    pub fn new() -> Self {
        Self::with_options(false)
    }

    fn with_options(fail_commit: bool) -> Self {
        Self {
            stats: Arc::new(SessionStats::default()),
            tx_open: AtomicBool::new(false),
            fail_commit,
        }
    }

    /// Shared handle to this session's counters
    pub fn stats(&self) -> Arc<SessionStats> {
        Arc::clone(&self.stats)
    }

    /// Whether a transaction is currently open
    pub fn in_transaction(&self) -> bool {
        self.tx_open.load(Ordering::SeqCst)
    }
}

impl Default for NullSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseSession for NullSession {
    async fn begin(&self) -> Result<()> {
        if self.tx_open.swap(true, Ordering::SeqCst) {
            return Err(Error::transaction(
                "a transaction is already open on this session",
            ));
        }
        self.stats.begins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        if !self.tx_open.load(Ordering::SeqCst) {
            // COMMIT outside a transaction is a warning no-op on a real
            // connection; keep it invisible to the counters.
            return Ok(());
        }
        if self.fail_commit {
            return Err(Error::transaction("simulated commit failure"));
        }
        self.tx_open.store(false, Ordering::SeqCst);
        self.stats.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        if !self.tx_open.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        self.stats.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        self.stats
            .statements
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(sql.to_string());
        Ok(1)
    }

    async fn fetch_scalar(&self, sql: &str) -> Result<Option<String>> {
        self.stats
            .statements
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(sql.to_string());
        Ok(Some("1".to_string()))
    }

    async fn close(&self) -> Result<()> {
        if self.tx_open.swap(false, Ordering::SeqCst) {
            self.stats.rollbacks.fetch_add(1, Ordering::SeqCst);
        }
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "null"
    }
}

impl Drop for NullSession {
    fn drop(&mut self) {
        // A cancelled unit of work never reaches close(); releasing the
        // session still rolls back whatever was in flight.
        if self.tx_open.swap(false, Ordering::SeqCst) {
            self.stats.rollbacks.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Factory vending instrumented null sessions
pub struct NullSessionFactory {
    opened: Mutex<Vec<Arc<SessionStats>>>,
    disposed: AtomicBool,
    fail_commit: bool,
}

impl NullSessionFactory {
    /// Create a factory whose sessions always succeed
    pub fn new() -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            disposed: AtomicBool::new(false),
            fail_commit: false,
        }
    }

    /// Create a factory whose sessions reject every commit
    pub fn failing_commit() -> Self {
        Self {
            fail_commit: true,
            ..Self::new()
        }
    }

    /// Stats of every session opened so far, in open order
    pub fn sessions(&self) -> Vec<Arc<SessionStats>> {
        self.opened.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Stats of the most recently opened session
    pub fn last_session(&self) -> Option<Arc<SessionStats>> {
        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    /// Whether `dispose` has been called
    pub fn disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl Default for NullSessionFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionFactory for NullSessionFactory {
    async fn open_session(&self) -> Result<Arc<dyn DatabaseSession>> {
        let session = NullSession::with_options(self.fail_commit);
        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(session.stats());
        Ok(Arc::new(session))
    }

    async fn dispose(&self) -> Result<()> {
        self.disposed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "null"
    }
}
