//! Dependency-order resolution for plans.
//!
//! Implements Kahn's algorithm over the `depends_on` edges of a plan. The
//! tie-break between steps that become schedulable at the same time is the
//! plan's declaration order, which keeps replays reproducible for a given
//! input. The resolver is pure: it never blocks and never mutates the plan.

use std::collections::{HashMap, VecDeque};

use crate::error::{RelayError, Result};
use crate::models::Plan;

/// Computes a valid serial execution order for the plan's steps.
///
/// Returns the step ids such that every step appears after all steps it
/// depends on. If the dependency graph contains a cycle, returns
/// [`RelayError::DependencyCycle`] naming the steps that could not be
/// scheduled rather than a partial order.
///
/// Callers must have checked that every dependency id resolves to a step
/// ([`Plan::validate`] does); unknown ids here would silently drop edges.
pub fn execution_order(plan: &Plan) -> Result<Vec<String>> {
    let index_of: HashMap<&str, usize> = plan
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| (step.id.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; plan.steps.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); plan.steps.len()];

    for (i, step) in plan.steps.iter().enumerate() {
        for dep in &step.depends_on {
            if let Some(&producer) = index_of.get(dep.as_str()) {
                in_degree[i] += 1;
                dependents[producer].push(i);
            }
        }
    }

    // FIFO queue seeded in declaration order keeps the order deterministic.
    let mut queue: VecDeque<usize> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(i, _)| i)
        .collect();

    let mut order = Vec::with_capacity(plan.steps.len());
    let mut scheduled = vec![false; plan.steps.len()];

    while let Some(i) = queue.pop_front() {
        scheduled[i] = true;
        order.push(plan.steps[i].id.clone());

        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() < plan.steps.len() {
        let ids = plan
            .steps
            .iter()
            .enumerate()
            .filter(|(i, _)| !scheduled[*i])
            .map(|(_, step)| step.id.clone())
            .collect();
        return Err(RelayError::DependencyCycle { ids });
    }

    Ok(order)
}
