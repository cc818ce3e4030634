use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use relay_core::{Corrector, CorrectorError, Engine, EngineError, SqliteEngine, Table};
use tempfile::TempDir;

/// Creates a temp-file SQLite database seeded with an `orders` table.
pub fn seeded_db() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("test_orders.db");

    let connection = rusqlite::Connection::open(&db_path).expect("Failed to open database");
    connection
        .execute_batch(
            "CREATE TABLE orders (id INTEGER PRIMARY KEY, month TEXT NOT NULL, total INTEGER NOT NULL);
             INSERT INTO orders (month, total) VALUES
                ('Nov', 100), ('Nov', 250), ('Nov', 50),
                ('Dec', 300), ('Dec', 120), ('Dec', 80);",
        )
        .expect("Failed to seed database");

    (temp_dir, db_path)
}

/// Opens an engine over the seeded database.
pub fn seeded_engine(db_path: &Path) -> Arc<SqliteEngine> {
    Arc::new(SqliteEngine::open(db_path).expect("Failed to open engine"))
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An engine that always fails with a fixed message, counting calls.
pub struct FailingEngine {
    message: String,
    pub calls: AtomicUsize,
}

impl FailingEngine {
    pub fn new(message: &str) -> Arc<Self> {
        Arc::new(Self {
            message: message.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Engine for FailingEngine {
    fn execute(&self, _sql: &str) -> Result<Table, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EngineError::new(self.message.clone()))
    }
}

/// A corrector that always answers with a fixed replacement statement,
/// counting how often it was consulted.
pub struct StubCorrector {
    replacement: String,
    pub calls: AtomicUsize,
}

impl StubCorrector {
    pub fn returning(replacement: &str) -> Arc<Self> {
        Arc::new(Self {
            replacement: replacement.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Corrector for StubCorrector {
    fn fix(
        &self,
        _failing_sql: &str,
        _error_text: &str,
        _intent: &str,
        _attempt: u32,
    ) -> Result<String, CorrectorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.replacement.clone())
    }
}
