//! Tabular result values produced by statement execution.

use serde::{Deserialize, Serialize};

/// A single cell value in a result table.
///
/// Mirrors the SQLite storage classes. The binder renders these back into SQL
/// literals when a completed step's table is materialized for a dependent
/// statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    /// SQL NULL
    Null,
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit float
    Real(f64),
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Blob(Vec<u8>),
}

impl Value {
    /// Render the value as a SQL literal suitable for a VALUES/SELECT list.
    ///
    /// Strings are single-quoted with embedded quotes doubled; blobs use the
    /// `X'..'` hex form; NULL is explicit.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) => r.to_string(),
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Blob(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }
}

impl From<rusqlite::types::Value> for Value {
    fn from(value: rusqlite::types::Value) -> Self {
        match value {
            rusqlite::types::Value::Null => Value::Null,
            rusqlite::types::Value::Integer(i) => Value::Integer(i),
            rusqlite::types::Value::Real(r) => Value::Real(r),
            rusqlite::types::Value::Text(s) => Value::Text(s),
            rusqlite::types::Value::Blob(b) => Value::Blob(b),
        }
    }
}

/// An ordered result set: column names plus rows of values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Column names in declared order
    pub columns: Vec<String>,

    /// Row values, each aligned with `columns`
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates a table from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True if the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drops rows beyond `max`, returning true if anything was removed.
    ///
    /// Applied only to a plan's final result; upstream tables are never
    /// truncated so dependent statements see full data.
    pub fn truncate(&mut self, max: usize) -> bool {
        if self.rows.len() > max {
            self.rows.truncate(max);
            true
        } else {
            false
        }
    }
}
