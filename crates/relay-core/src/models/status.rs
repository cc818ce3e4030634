//! Status enumeration for plan steps.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of step execution statuses.
///
/// Transitions are forward-only: a step may re-enter [`Executing`] while the
/// recovery loop retries a corrected statement, but it never reverts to
/// [`Pending`], and nothing follows [`Completed`] or [`Failed`].
///
/// [`Executing`]: StepStatus::Executing
/// [`Pending`]: StepStatus::Pending
/// [`Completed`]: StepStatus::Completed
/// [`Failed`]: StepStatus::Failed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step has not started executing
    #[default]
    Pending,

    /// Step is currently executing (possibly on a retry attempt)
    Executing,

    /// Step executed successfully and its results are available
    Completed,

    /// Step failed and will not be attempted again
    Failed,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "executing" => Ok(StepStatus::Executing),
            "completed" => Ok(StepStatus::Completed),
            "failed" => Ok(StepStatus::Failed),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Convert to the wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Executing => "executing",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }

    /// True once no further transitions can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }
}
