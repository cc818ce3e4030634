//! End-to-end plan execution.
//!
//! The [`Executor`] drives a whole run: it validates the plan, asks the
//! order resolver for a dependency-safe sequence, binds each step's
//! statement over the results accumulated so far, wraps every execution in
//! the bounded recovery loop, and records status and timing as it goes.
//! Execution is strictly serial, which keeps replays deterministic.
//!
//! The executor is async-facing but the engine and corrector collaborators
//! are blocking calls, so each run moves onto a blocking task, mirroring the
//! async-facade-over-blocking-core split used elsewhere in the stack.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use relay_core::{ExecutorBuilder, Plan, SqliteEngine};
//! use relay_core::corrector::NoCorrector;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = ExecutorBuilder::new()
//!     .with_engine(Arc::new(SqliteEngine::open("data.db")?))
//!     .with_corrector(Arc::new(NoCorrector))
//!     .build()?;
//!
//! let plan = Plan::single("SELECT COUNT(*) FROM orders", None);
//! let report = executor.run(plan, Some(100)).await?;
//! if let Some(table) = &report.final_result {
//!     println!("{} rows", table.row_count());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::task;

use crate::corrector::Corrector;
use crate::engine::Engine;
use crate::error::{RelayError, Result};
use crate::models::Plan;

pub mod builder;
pub mod report;
mod run;

pub use builder::ExecutorBuilder;
pub use report::{PlanReport, StepFailure};

/// What happens to the rest of a plan when one step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run; steps not yet started stay pending
    #[default]
    HaltAll,

    /// Keep executing steps whose dependencies all completed; transitive
    /// dependents of the failed step stay pending
    ContinueIndependent,
}

/// Main executor interface for running query plans.
pub struct Executor {
    pub(crate) engine: Arc<dyn Engine>,
    pub(crate) corrector: Arc<dyn Corrector>,
    pub(crate) max_retries: u32,
    pub(crate) failure_policy: FailurePolicy,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("max_retries", &self.max_retries)
            .field("failure_policy", &self.failure_policy)
            .finish_non_exhaustive()
    }
}

impl Executor {
    /// Creates a builder for configuring an executor.
    pub fn builder() -> ExecutorBuilder {
        ExecutorBuilder::new()
    }

    /// Runs the plan to completion or first unrecoverable failure.
    ///
    /// `max_final_rows` caps only the final step's result; upstream results
    /// stay complete for dependent statements. Structural plan violations
    /// return `Err` before anything executes; step-level failures come back
    /// inside the [`PlanReport`] together with every completed step's data.
    pub async fn run(&self, plan: Plan, max_final_rows: Option<usize>) -> Result<PlanReport> {
        let engine = Arc::clone(&self.engine);
        let corrector = Arc::clone(&self.corrector);
        let options = run::RunOptions {
            max_retries: self.max_retries,
            failure_policy: self.failure_policy,
            max_final_rows,
        };

        task::spawn_blocking(move || run::drive(engine.as_ref(), corrector.as_ref(), plan, &options))
            .await
            .map_err(|e| RelayError::Runtime {
                message: format!("Task join error: {e}"),
            })?
    }
}
