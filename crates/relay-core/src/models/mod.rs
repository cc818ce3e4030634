//! Data models for query plans and steps.
//!
//! This module contains the core domain models of the relay execution
//! substrate: a [`Plan`] is the full unit of work for one caller question, a
//! [`Step`] is one SQL statement plus its dependency edges and run-time
//! state, and a [`Table`] is the ordered tabular result a completed step
//! produces. All types carry serde derives so a plan (including mid-run
//! status, results and errors) snapshots losslessly to JSON and back.

pub mod plan;
pub mod status;
pub mod step;
pub mod table;


// Re-export all public types at the models level
pub use plan::Plan;
pub use status::StepStatus;
pub use step::Step;
pub use table::{Table, Value};
