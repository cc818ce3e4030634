//! Error types for the relay library.
//!
//! Structural plan violations are surfaced here as [`RelayError`] variants and
//! abort a run before any statement executes. Per-step execution failures are
//! *not* errors at this level: they travel inside the run report as
//! [`crate::executor::StepFailure`] values so callers always receive the
//! partial results that did complete.

use thiserror::Error;

/// Comprehensive error type for all relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Plan contains no steps
    #[error("Plan contains no steps")]
    EmptyPlan,
    /// Two steps share the same id
    #[error("Duplicate step id '{id}' in plan")]
    DuplicateStepId { id: String },
    /// The plan's final step id does not name any step
    #[error("Final step id '{id}' not found in plan")]
    UnknownFinalStep { id: String },
    /// A step depends on an id that names no step in the plan
    #[error("Step '{step_id}' depends on unknown step '{dependency}'")]
    UnknownDependency { step_id: String, dependency: String },
    /// The dependency graph contains a cycle; no valid order exists
    #[error("Dependency cycle involving steps: {}", ids.join(", "))]
    DependencyCycle { ids: Vec<String> },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Executor misconfiguration (missing collaborator, bad bounds)
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// Runtime plumbing failures (task join, poisoned locks)
    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

impl RelayError {
    /// True for plan-shape violations that are detected before execution.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            RelayError::EmptyPlan
                | RelayError::DuplicateStepId { .. }
                | RelayError::UnknownFinalStep { .. }
                | RelayError::UnknownDependency { .. }
                | RelayError::DependencyCycle { .. }
        )
    }
}

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
