//! Step model definition and related functionality.

use serde::{Deserialize, Serialize};

use super::{StepStatus, Table};

/// One SQL statement within a plan, plus its run-time state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Unique identifier within the plan (e.g. "q1")
    pub id: String,

    /// Human-readable purpose of the statement; passed to the corrector as
    /// intent context but never interpreted by execution logic
    #[serde(default)]
    pub description: String,

    /// The statement text. Replaced in place when the recovery loop obtains
    /// a corrected version.
    pub sql: String,

    /// Ids of steps whose results this statement may reference
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Current execution status
    #[serde(default)]
    pub status: StepStatus,

    /// Tabular result, present once the step completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Table>,

    /// Last failure message. Retained even after a successful retry
    /// overwrote the statement, for audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Number of execution attempts made (enforces the retry bound)
    #[serde(default)]
    pub attempts: u32,

    /// Wall-clock time spent on this step, including failed attempts and
    /// correction round-trips (milliseconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<f64>,

    /// Number of rows returned, once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
}

impl Step {
    /// Creates a pending step with no dependencies.
    pub fn new(id: impl Into<String>, description: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            sql: sql.into(),
            depends_on: Vec::new(),
            status: StepStatus::Pending,
            results: None,
            error: None,
            attempts: 0,
            execution_time_ms: None,
            row_count: None,
        }
    }

    /// Sets the dependency edges, builder style.
    pub fn with_depends_on<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = ids.into_iter().map(Into::into).collect();
        self
    }
}
