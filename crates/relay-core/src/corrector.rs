//! The statement-correction collaborator.
//!
//! When a statement fails with a retryable error, the recovery loop asks a
//! [`Corrector`] for a replacement. The corrector is opaque to the core: it
//! is typically an LLM-backed service, but the retry bound and the decision
//! of *whether* to correct belong to the recovery loop, never here.

use thiserror::Error;

/// Failure to produce a corrected statement.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct CorrectorError {
    /// Why no correction could be produced
    pub message: String,
}

impl CorrectorError {
    /// Creates a corrector error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Produces a corrected statement for a failing one.
pub trait Corrector: Send + Sync {
    /// Requests a replacement for `failing_sql`.
    ///
    /// `error_text` is the engine's failure message, `intent` is the step's
    /// declared human-readable purpose, and `attempt` is the 1-based
    /// correction attempt number.
    fn fix(
        &self,
        failing_sql: &str,
        error_text: &str,
        intent: &str,
        attempt: u32,
    ) -> Result<String, CorrectorError>;
}

/// A corrector for callers running without a correction backend.
///
/// Always declines, so retryable failures fail on their first attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCorrector;

impl Corrector for NoCorrector {
    fn fix(
        &self,
        _failing_sql: &str,
        _error_text: &str,
        _intent: &str,
        _attempt: u32,
    ) -> Result<String, CorrectorError> {
        Err(CorrectorError::new("no corrector configured"))
    }
}
