//! Core library for the Relay multi-query execution substrate.
//!
//! Relay sits underneath a natural-language-to-SQL product: an upstream
//! generator turns a question into a [`Plan`] of interdependent SQL steps,
//! and this crate decides in what order to run them, how to thread
//! intermediate results between them, what to do when a statement fails,
//! and when to give up.
//!
//! # Architecture
//!
//! - **Models** ([`models`]): the [`Plan`]/[`Step`] data model and its
//!   structural validation (unique ids, resolvable dependencies, acyclicity)
//! - **Order resolution** ([`order`]): deterministic topological ordering
//!   with cycle detection
//! - **Result binding** ([`binder`]): materializes completed steps' tables
//!   as CTEs so dependent statements can reference them by step id
//! - **Recovery** ([`recovery`]): classifies failures and drives bounded,
//!   corrector-assisted retries
//! - **Execution** ([`executor`]): the end-to-end [`Executor::run`] surface,
//!   returning a [`PlanReport`] with per-step status, timing and the
//!   (optionally row-capped) final result
//!
//! The relational engine and the statement corrector are collaborator
//! traits ([`engine::Engine`], [`corrector::Corrector`]); a rusqlite-backed
//! [`SqliteEngine`] ships in-tree.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use relay_core::corrector::NoCorrector;
//! use relay_core::{ExecutorBuilder, Plan, SqliteEngine, Step};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = ExecutorBuilder::new()
//!     .with_engine(Arc::new(SqliteEngine::open("sales.db")?))
//!     .with_corrector(Arc::new(NoCorrector))
//!     .build()?;
//!
//! let plan = Plan::new(
//!     vec![
//!         Step::new("q1", "November total", "SELECT SUM(total) AS total FROM orders WHERE month = 'Nov'"),
//!         Step::new("q2", "Double it", "SELECT total * 2 FROM q1").with_depends_on(["q1"]),
//!     ],
//!     "q2",
//! );
//!
//! let report = executor.run(plan, Some(100)).await?;
//! println!("success: {}", report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod corrector;
pub mod engine;
pub mod error;
pub mod executor;
pub mod models;
pub mod order;
pub mod recovery;

// Re-export commonly used types
pub use corrector::{Corrector, CorrectorError, NoCorrector};
pub use engine::{Engine, EngineError, SqliteEngine};
pub use error::{RelayError, Result};
pub use executor::{Executor, ExecutorBuilder, FailurePolicy, PlanReport, StepFailure};
pub use models::{Plan, Step, StepStatus, Table, Value};
pub use recovery::FailureKind;
