//! Plan model definition and structural validation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Step, StepStatus};
use crate::error::{RelayError, Result};
use crate::order;

/// The full set of interdependent SQL steps answering one caller question.
///
/// A plan is constructed once per incoming question by an upstream generator
/// and handed to the executor, which owns all subsequent mutation of step
/// status, results, errors and attempt counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// The steps, keyed by their ids; declaration order is only used as the
    /// deterministic tie-break when scheduling
    pub steps: Vec<Step>,

    /// Id of the step whose result is the plan's answer
    pub final_step_id: String,

    /// Original caller intent, carried for traceability only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// Aggregate wall-clock time, set once execution completes or aborts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_execution_time_ms: Option<f64>,
}

impl Plan {
    /// Creates a plan from steps and the id of its final step.
    pub fn new(steps: Vec<Step>, final_step_id: impl Into<String>) -> Self {
        Self {
            steps,
            final_step_id: final_step_id.into(),
            question: None,
            total_execution_time_ms: None,
        }
    }

    /// Attaches the original natural-language question, builder style.
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    /// Creates a single-statement plan with no dependencies.
    ///
    /// This is the backward-compatible degenerate case: running it behaves
    /// identically to direct single-statement execution.
    pub fn single(sql: impl Into<String>, question: Option<String>) -> Self {
        let step = Step::new("q1", "Execute query", sql);
        Self {
            steps: vec![step],
            final_step_id: "q1".to_string(),
            question,
            total_execution_time_ms: None,
        }
    }

    /// Validates the plan's structural invariants, returning the first
    /// violation found.
    ///
    /// Checks, in order: the plan is non-empty, step ids are unique, the
    /// final step id names a step, every dependency names a step, and the
    /// dependency graph is acyclic (a self-dependency is a cycle of length
    /// one). The cycle check reuses the same Kahn pass the order resolver
    /// runs, so a plan that validates always has a computable execution
    /// order.
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(RelayError::EmptyPlan);
        }

        let mut ids: HashSet<&str> = HashSet::with_capacity(self.steps.len());
        for step in &self.steps {
            if !ids.insert(step.id.as_str()) {
                return Err(RelayError::DuplicateStepId {
                    id: step.id.clone(),
                });
            }
        }

        if !ids.contains(self.final_step_id.as_str()) {
            return Err(RelayError::UnknownFinalStep {
                id: self.final_step_id.clone(),
            });
        }

        for step in &self.steps {
            for dep in &step.depends_on {
                if !ids.contains(dep.as_str()) {
                    return Err(RelayError::UnknownDependency {
                        step_id: step.id.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        order::execution_order(self).map(|_| ())
    }

    /// Looks up a step by id.
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Looks up a step by id, mutably.
    pub fn step_mut(&mut self, id: &str) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.id == id)
    }

    /// The step designated as the plan's answer, if present.
    pub fn final_step(&self) -> Option<&Step> {
        self.step(&self.final_step_id)
    }

    /// True once every step has completed.
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::Completed)
    }

    /// True if any step failed.
    pub fn has_failures(&self) -> bool {
        self.steps.iter().any(|s| s.status == StepStatus::Failed)
    }

    /// Serializes the plan to JSON, including per-step status, results and
    /// errors, so mid-run snapshots round-trip losslessly.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes a plan from JSON produced by [`Plan::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
