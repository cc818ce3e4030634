//! Builder for creating and configuring Executor instances.

use std::sync::Arc;

use super::{Executor, FailurePolicy};
use crate::corrector::Corrector;
use crate::engine::Engine;
use crate::error::{RelayError, Result};
use crate::recovery::DEFAULT_MAX_RETRIES;

/// Builder for creating and configuring [`Executor`] instances.
#[derive(Clone, Default)]
pub struct ExecutorBuilder {
    engine: Option<Arc<dyn Engine>>,
    corrector: Option<Arc<dyn Corrector>>,
    max_retries: Option<u32>,
    failure_policy: FailurePolicy,
}

impl ExecutorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relational engine collaborator (required).
    pub fn with_engine(mut self, engine: Arc<dyn Engine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Sets the statement-correction collaborator (required; use
    /// [`crate::corrector::NoCorrector`] to run without one).
    pub fn with_corrector(mut self, corrector: Arc<dyn Corrector>) -> Self {
        self.corrector = Some(corrector);
        self
    }

    /// Sets the number of correction attempts allowed beyond the first
    /// execution of each step. Defaults to 2.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets what happens to the rest of the plan when a step fails.
    /// Defaults to [`FailurePolicy::HaltAll`].
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Builds the configured executor instance.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` if the engine or corrector is
    /// missing.
    pub fn build(self) -> Result<Executor> {
        let engine = self.engine.ok_or_else(|| RelayError::Configuration {
            message: "An engine is required".to_string(),
        })?;
        let corrector = self.corrector.ok_or_else(|| RelayError::Configuration {
            message: "A corrector is required".to_string(),
        })?;

        Ok(Executor {
            engine,
            corrector,
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            failure_policy: self.failure_policy,
        })
    }
}
