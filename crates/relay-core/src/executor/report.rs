//! The result surface returned by a plan run.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::{Plan, Table};
use crate::recovery::FailureKind;

/// Detail of the step that halted (or dented) a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepFailure {
    /// Id of the failed step
    pub step_id: String,
    /// Failure message, prefixed when retries were attempted and exhausted
    pub message: String,
    /// Total execution attempts made for the step
    pub attempts: u32,
    /// Classification of the failure
    pub kind: FailureKind,
}

/// Everything a caller gets back from [`crate::Executor::run`].
///
/// On failure the report is still returned with the completed steps' data
/// intact, so partial insight is never silently discarded; only structural
/// plan violations abort with a bare error before execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    /// The executed plan, carrying per-step status, results, errors,
    /// attempts and timing
    pub plan: Plan,

    /// The final step's result, row-capped if a ceiling was supplied;
    /// absent when the final step did not complete
    pub final_result: Option<Table>,

    /// The first step failure encountered, if any
    pub failure: Option<StepFailure>,

    /// Sum of wall-clock time across all attempted steps, including failed
    /// attempts and correction round-trips (milliseconds)
    pub total_execution_time_ms: f64,

    /// When the run finished (UTC)
    pub completed_at: Timestamp,
}

impl PlanReport {
    /// True when the plan produced its final answer without any failure.
    pub fn is_success(&self) -> bool {
        self.failure.is_none() && self.final_result.is_some()
    }
}
