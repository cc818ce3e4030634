//! Result substitution for dependent statements.
//!
//! A dependent statement references an upstream step's result by the
//! producing step's id, as if it were a table (`SELECT ... FROM q1`). The
//! binder makes that reference resolvable without any cross-statement engine
//! state: each completed dependency is materialized as a common table
//! expression built from literal row values and prepended to the statement.
//! Column names and their declared order exactly match the producing step's
//! result schema, strings are escaped, and missing values render as explicit
//! NULLs.

use std::collections::HashMap;

use log::warn;

use crate::models::{Step, Table};

/// Rewrites a step's statement so its declared dependencies are resolvable.
///
/// A statement with no declared dependencies passes through untouched. A
/// declared dependency without a cached result is skipped with a warning;
/// the executor only binds steps whose dependencies completed, so this only
/// fires on executor bugs, not on caller input.
pub fn bind(step: &Step, completed: &HashMap<String, Table>) -> String {
    if step.depends_on.is_empty() {
        return step.sql.clone();
    }

    let mut ctes = Vec::with_capacity(step.depends_on.len());
    for dep_id in &step.depends_on {
        let Some(table) = completed.get(dep_id) else {
            warn!("Dependency {dep_id} of step {} has no cached result", step.id);
            continue;
        };
        if table.columns.is_empty() {
            warn!("Dependency {dep_id} of step {} produced no columns", step.id);
            continue;
        }
        ctes.push(materialize(dep_id, table));
    }

    if ctes.is_empty() {
        return step.sql.clone();
    }

    splice(&ctes.join(", "), &step.sql)
}

/// Renders one completed result as a named, read-only CTE.
fn materialize(id: &str, table: &Table) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ");

    let body = if table.rows.is_empty() {
        // Zero rows with the right arity keeps the relation addressable.
        let nulls = vec!["NULL"; table.columns.len()].join(", ");
        format!("SELECT {nulls} WHERE 1 = 0")
    } else {
        table
            .rows
            .iter()
            .map(|row| {
                let literals = row
                    .iter()
                    .map(|v| v.to_sql_literal())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("SELECT {literals}")
            })
            .collect::<Vec<_>>()
            .join(" UNION ALL ")
    };

    format!("{}({columns}) AS ({body})", quote_identifier(id))
}

/// Prepends the generated CTE list to the statement.
///
/// A statement that already opens its own WITH clause has the generated CTEs
/// spliced in front of its list instead of producing a nested WITH.
fn splice(ctes: &str, sql: &str) -> String {
    let trimmed = sql.trim_start();
    match trimmed.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("with ") => {
            format!("WITH {ctes}, {}", &trimmed[5..])
        }
        _ => format!("WITH {ctes} {sql}"),
    }
}

/// Double-quotes an identifier, escaping embedded quotes.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
