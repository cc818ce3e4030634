//! The synchronous drive loop behind [`super::Executor::run`].

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, info, warn};

use super::report::{PlanReport, StepFailure};
use super::FailurePolicy;
use crate::binder;
use crate::corrector::Corrector;
use crate::engine::Engine;
use crate::error::Result;
use crate::models::{Plan, StepStatus, Table};
use crate::order;
use crate::recovery::Recovery;

pub(super) struct RunOptions {
    pub max_retries: u32,
    pub failure_policy: FailurePolicy,
    pub max_final_rows: Option<usize>,
}

/// Validates, orders and executes the plan, mutating step state in place.
///
/// Structural violations (including cycles) return `Err` before any
/// statement runs. Step failures are recorded in the report; under
/// [`FailurePolicy::HaltAll`] the first failure stops the run and the
/// remaining steps stay pending, while [`FailurePolicy::ContinueIndependent`]
/// keeps executing steps whose dependencies all completed.
pub(super) fn drive(
    engine: &dyn Engine,
    corrector: &dyn Corrector,
    mut plan: Plan,
    options: &RunOptions,
) -> Result<PlanReport> {
    plan.validate()?;
    let execution_order = order::execution_order(&plan)?;

    info!(
        "Executing plan with {} steps (final: {})",
        plan.steps.len(),
        plan.final_step_id
    );

    let recovery = Recovery::new(options.max_retries);
    let mut completed: HashMap<String, Table> = HashMap::new();
    let mut failure: Option<StepFailure> = None;
    let mut total_ms = 0.0;

    for id in execution_order {
        let ready = plan
            .step(&id)
            .is_some_and(|s| s.depends_on.iter().all(|d| completed.contains_key(d)));
        if !ready {
            // Only reachable when an upstream failure was tolerated; the
            // dependent stays pending for diagnostics.
            debug!("Skipping step {id}: upstream dependency did not complete");
            continue;
        }

        let Some(step) = plan.step_mut(&id) else {
            continue;
        };

        step.status = StepStatus::Executing;
        let bound_sql = binder::bind(step, &completed);

        let started = Instant::now();
        let outcome = recovery.execute(engine, corrector, step, bound_sql);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        step.execution_time_ms = Some(elapsed_ms);
        total_ms += elapsed_ms;

        match outcome {
            Ok(table) => {
                step.status = StepStatus::Completed;
                step.row_count = Some(table.row_count());
                step.results = Some(table.clone());
                info!(
                    "Step {id} completed: {} rows in {elapsed_ms:.1}ms",
                    table.row_count()
                );
                completed.insert(id, table);
            }
            Err(failed) => {
                step.status = StepStatus::Failed;
                warn!(
                    "Step {id} failed after {} attempts: {}",
                    step.attempts, failed.message
                );
                if failure.is_none() {
                    failure = Some(StepFailure {
                        step_id: id,
                        message: failed.message,
                        attempts: step.attempts,
                        kind: failed.kind,
                    });
                }
                if options.failure_policy == FailurePolicy::HaltAll {
                    break;
                }
            }
        }
    }

    plan.total_execution_time_ms = Some(total_ms);

    let mut final_result = plan.final_step().and_then(|s| {
        if s.status == StepStatus::Completed {
            s.results.clone()
        } else {
            None
        }
    });
    if let (Some(table), Some(max)) = (final_result.as_mut(), options.max_final_rows) {
        if table.truncate(max) {
            warn!("Final result truncated to {max} rows");
        }
    }

    info!(
        "Plan execution {}: {total_ms:.1}ms total",
        if failure.is_none() { "completed" } else { "failed" }
    );

    Ok(PlanReport {
        plan,
        final_result,
        failure,
        total_execution_time_ms: total_ms,
        completed_at: jiff::Timestamp::now(),
    })
}
