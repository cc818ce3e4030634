//! Failure classification and the bounded correction loop.
//!
//! Engine failures are classified by pattern-matching their plain-text
//! messages. This is the one place in the crate where string-sniffing of
//! errors is allowed; everywhere else failures travel as typed values.
//! Retryable failures trigger a correction request to the [`Corrector`]
//! collaborator, up to a configured bound of additional attempts; fatal
//! failures (permissions, locking, storage) fail immediately with no
//! correction attempt.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::corrector::Corrector;
use crate::engine::Engine;
use crate::models::{Step, Table};

/// Default number of correction attempts beyond the first execution.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Error patterns a corrected statement can plausibly fix.
const RETRYABLE_PATTERNS: &[&str] = &[
    "ambiguous column",           // missing table aliases
    "no such column",             // wrong column name
    "no such table",              // wrong table name
    "syntax error",               // general SQL syntax issues
    "near",                       // SQLite syntax error indicator
    "join",                       // missing or malformed join predicates
    "type mismatch",
    "datatype mismatch",
    "invalid",                    // various invalid operations
    "only execute one statement", // multiple statements in one call
    "multiple statements",
];

/// Error patterns no rewritten statement will fix.
const FATAL_PATTERNS: &[&str] = &[
    "permission denied",
    "database is locked",
    "disk i/o error",
    "out of memory",
    "database disk image is malformed",
];

/// Why a step ended up failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Non-retryable engine failure; the corrector was never consulted
    Fatal,
    /// Retryable failure that survived every allowed correction attempt
    RetriesExhausted,
    /// The corrector itself failed to produce a replacement statement
    CorrectionFailed,
}

/// A step-level failure carried out of the recovery loop.
#[derive(Debug, Clone)]
pub(crate) struct RecoveryFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// True if the error text matches the retryable pattern set.
///
/// Fatal patterns win over retryable ones, and unknown messages are not
/// retried.
pub fn is_retryable(error_text: &str) -> bool {
    let lower = error_text.to_lowercase();

    if FATAL_PATTERNS.iter().any(|p| lower.contains(p)) {
        return false;
    }

    RETRYABLE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// The bounded retry loop wrapped around each statement execution.
pub(crate) struct Recovery {
    max_retries: u32,
}

impl Recovery {
    pub(crate) fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Executes the bound statement, correcting and re-executing on
    /// retryable failures until success or the retry bound is exhausted.
    ///
    /// Each execution attempt increments `step.attempts`; the last failure
    /// message is kept in `step.error` even when a later attempt succeeds,
    /// and a corrected statement replaces `step.sql` in place.
    pub(crate) fn execute(
        &self,
        engine: &dyn Engine,
        corrector: &dyn Corrector,
        step: &mut Step,
        bound_sql: String,
    ) -> Result<Table, RecoveryFailure> {
        let mut sql = bound_sql;

        loop {
            step.attempts += 1;
            debug!("Executing step {} (attempt {})", step.id, step.attempts);

            let error = match engine.execute(&sql) {
                Ok(table) => return Ok(table),
                Err(e) => e,
            };

            warn!("Step {} failed: {}", step.id, error.message);
            step.error = Some(error.message.clone());

            if !is_retryable(&error.message) {
                return Err(RecoveryFailure {
                    kind: FailureKind::Fatal,
                    message: error.message,
                });
            }

            // attempts counts executions; retries used so far is attempts - 1.
            let retries_used = step.attempts - 1;
            if retries_used >= self.max_retries {
                return Err(RecoveryFailure {
                    kind: FailureKind::RetriesExhausted,
                    message: format!(
                        "Retries exhausted after {} attempts: {}",
                        step.attempts, error.message
                    ),
                });
            }

            let attempt = retries_used + 1;
            info!(
                "Requesting correction for step {} (attempt {attempt}/{})",
                step.id, self.max_retries
            );

            match corrector.fix(&sql, &error.message, &step.description, attempt) {
                Ok(corrected) => {
                    step.sql = corrected.clone();
                    sql = corrected;
                }
                Err(e) => {
                    return Err(RecoveryFailure {
                        kind: FailureKind::CorrectionFailed,
                        message: format!("Correction failed: {}", e.message),
                    });
                }
            }
        }
    }
}
