//! The relational engine collaborator.
//!
//! The core issues single statements and consumes tabular results through the
//! [`Engine`] trait; connection pooling, transactions across statements and
//! dialect concerns stay with the implementation. Errors travel as plain-text
//! messages because the recovery loop classifies failures by
//! pattern-matching that text.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use thiserror::Error;

use crate::models::{Table, Value};

/// Plain-text execution failure reported by an engine.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct EngineError {
    /// The engine's error text, matched by the retry classifier
    pub message: String,
}

impl EngineError {
    /// Creates an engine error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A relational engine capable of executing one statement at a time.
///
/// Implementations must support ordinary read statements and CTE syntax,
/// which the binder uses to materialize upstream results.
pub trait Engine: Send + Sync {
    /// Executes a single statement and returns its full result set.
    fn execute(&self, sql: &str) -> Result<Table, EngineError>;
}

/// SQLite-backed [`Engine`] over a single connection.
pub struct SqliteEngine {
    connection: Mutex<Connection>,
}

impl SqliteEngine {
    /// Opens (creating if necessary) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let connection = Connection::open(path)
            .map_err(|e| EngineError::new(format!("Failed to open database: {e}")))?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Opens an in-memory database, useful for tests and scratch work.
    pub fn open_in_memory() -> Result<Self, EngineError> {
        let connection = Connection::open_in_memory()
            .map_err(|e| EngineError::new(format!("Failed to open database: {e}")))?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

impl Engine for SqliteEngine {
    fn execute(&self, sql: &str) -> Result<Table, EngineError> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| EngineError::new("SQLite connection lock poisoned"))?;

        let mut statement = connection
            .prepare(sql)
            .map_err(|e| EngineError::new(e.to_string()))?;

        let columns: Vec<String> = statement
            .column_names()
            .iter()
            .map(|c| (*c).to_string())
            .collect();
        let column_count = columns.len();

        let mut rows = statement
            .query([])
            .map_err(|e| EngineError::new(e.to_string()))?;

        let mut collected: Vec<Vec<Value>> = Vec::new();
        while let Some(row) = rows.next().map_err(|e| EngineError::new(e.to_string()))? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value: rusqlite::types::Value =
                    row.get(i).map_err(|e| EngineError::new(e.to_string()))?;
                values.push(Value::from(value));
            }
            collected.push(values);
        }

        Ok(Table::new(columns, collected))
    }
}
