mod common;

use std::sync::Arc;

use common::{init_logging, seeded_db, seeded_engine, FailingEngine, StubCorrector};
use relay_core::{
    Engine, ExecutorBuilder, FailureKind, FailurePolicy, NoCorrector, Plan, RelayError, Step,
    StepStatus, Value,
};

#[tokio::test]
async fn single_step_plan_matches_direct_execution() {
    init_logging();
    let (_temp_dir, db_path) = seeded_db();
    let engine = seeded_engine(&db_path);

    let executor = ExecutorBuilder::new()
        .with_engine(engine.clone())
        .with_corrector(Arc::new(NoCorrector))
        .build()
        .expect("Failed to build executor");

    let sql = "SELECT month, total FROM orders ORDER BY id";
    let report = executor
        .run(Plan::single(sql, None), None)
        .await
        .expect("run should succeed");

    assert!(report.is_success());
    let direct = engine.execute(sql).expect("direct execution");
    assert_eq!(report.final_result, Some(direct));

    let step = report.plan.step("q1").expect("step exists");
    assert_eq!(step.status, StepStatus::Completed);
    assert_eq!(step.attempts, 1);
    assert_eq!(step.row_count, Some(6));
    assert!(step.execution_time_ms.is_some());
    assert!(report.plan.total_execution_time_ms.is_some());
}

#[tokio::test]
async fn chain_threads_results_between_steps() {
    init_logging();
    let (_temp_dir, db_path) = seeded_db();

    let executor = ExecutorBuilder::new()
        .with_engine(seeded_engine(&db_path))
        .with_corrector(Arc::new(NoCorrector))
        .build()
        .expect("Failed to build executor");

    let plan = Plan::new(
        vec![
            Step::new(
                "q1",
                "November total",
                "SELECT SUM(total) AS total FROM orders WHERE month = 'Nov'",
            ),
            Step::new(
                "q2",
                "December total",
                "SELECT SUM(total) AS total FROM orders WHERE month = 'Dec'",
            ),
            Step::new(
                "q3",
                "Difference",
                "SELECT (SELECT total FROM q2) - (SELECT total FROM q1) AS difference",
            )
            .with_depends_on(["q1", "q2"]),
        ],
        "q3",
    )
    .with_question("Compare November and December sales");

    let report = executor.run(plan, None).await.expect("run should succeed");

    assert!(report.is_success());
    let table = report.final_result.expect("final result");
    assert_eq!(table.columns, vec!["difference"]);
    // Dec (500) - Nov (400)
    assert_eq!(table.rows, vec![vec![Value::Integer(100)]]);
    assert!(report.plan.is_complete());
}

#[tokio::test]
async fn diamond_joins_both_branches() {
    init_logging();
    let (_temp_dir, db_path) = seeded_db();

    let executor = ExecutorBuilder::new()
        .with_engine(seeded_engine(&db_path))
        .with_corrector(Arc::new(NoCorrector))
        .build()
        .expect("Failed to build executor");

    let plan = Plan::new(
        vec![
            Step::new("q1", "All orders", "SELECT month, total FROM orders"),
            Step::new("q2", "Nov slice", "SELECT total FROM q1 WHERE month = 'Nov'")
                .with_depends_on(["q1"]),
            Step::new("q3", "Dec slice", "SELECT total FROM q1 WHERE month = 'Dec'")
                .with_depends_on(["q1"]),
            Step::new(
                "q4",
                "Both sums",
                "SELECT (SELECT SUM(total) FROM q2) AS nov, (SELECT SUM(total) FROM q3) AS dec",
            )
            .with_depends_on(["q2", "q3"]),
        ],
        "q4",
    );

    let report = executor.run(plan, None).await.expect("run should succeed");

    assert!(report.is_success());
    let table = report.final_result.expect("final result");
    assert_eq!(table.columns, vec!["nov", "dec"]);
    assert_eq!(
        table.rows,
        vec![vec![Value::Integer(400), Value::Integer(500)]]
    );
}

#[tokio::test]
async fn max_final_rows_caps_only_the_final_step() {
    init_logging();
    let (_temp_dir, db_path) = seeded_db();

    let executor = ExecutorBuilder::new()
        .with_engine(seeded_engine(&db_path))
        .with_corrector(Arc::new(NoCorrector))
        .build()
        .expect("Failed to build executor");

    let plan = Plan::new(
        vec![
            Step::new("q1", "All orders", "SELECT id, total FROM orders"),
            Step::new("q2", "Read back", "SELECT id, total FROM q1 ORDER BY id")
                .with_depends_on(["q1"]),
        ],
        "q2",
    );

    let report = executor
        .run(plan, Some(2))
        .await
        .expect("run should succeed");

    assert!(report.is_success());
    assert_eq!(report.final_result.expect("final result").row_count(), 2);

    // The upstream step keeps its full result; the dependent saw all rows.
    let q1 = report.plan.step("q1").expect("q1 exists");
    assert_eq!(q1.results.as_ref().map(relay_core::Table::row_count), Some(6));
    let q2 = report.plan.step("q2").expect("q2 exists");
    assert_eq!(q2.row_count, Some(6));
}

#[tokio::test]
async fn retryable_failure_recovers_via_corrector() {
    init_logging();
    let (_temp_dir, db_path) = seeded_db();
    let corrector = StubCorrector::returning("SELECT SUM(total) AS total FROM orders");

    let executor = ExecutorBuilder::new()
        .with_engine(seeded_engine(&db_path))
        .with_corrector(corrector.clone())
        .build()
        .expect("Failed to build executor");

    // "totl" misspelling produces a retryable "no such column" error.
    let plan = Plan::single("SELECT SUM(totl) AS total FROM orders", None);
    let report = executor.run(plan, None).await.expect("run should succeed");

    assert!(report.is_success());
    assert_eq!(corrector.call_count(), 1);

    let step = report.plan.step("q1").expect("step exists");
    assert_eq!(step.status, StepStatus::Completed);
    assert_eq!(step.attempts, 2);
    // The corrected statement replaced the original, the failure is kept.
    assert_eq!(step.sql, "SELECT SUM(total) AS total FROM orders");
    assert!(step.error.as_deref().is_some_and(|e| e.contains("totl")));
}

#[tokio::test]
async fn exhausted_retries_fail_the_step_and_halt() {
    init_logging();
    let (_temp_dir, db_path) = seeded_db();
    // The "correction" is just as broken as the original statement.
    let corrector = StubCorrector::returning("SELECT SUM(totl) AS total FROM orders");

    let executor = ExecutorBuilder::new()
        .with_engine(seeded_engine(&db_path))
        .with_corrector(corrector.clone())
        .build()
        .expect("Failed to build executor");

    let plan = Plan::new(
        vec![
            Step::new("q1", "Broken", "SELECT SUM(totl) AS total FROM orders"),
            Step::new("q2", "Dependent", "SELECT total FROM q1").with_depends_on(["q1"]),
        ],
        "q2",
    );

    let report = executor.run(plan, None).await.expect("run returns a report");

    assert!(!report.is_success());
    assert!(report.final_result.is_none());
    assert_eq!(corrector.call_count(), 2);

    let q1 = report.plan.step("q1").expect("q1 exists");
    assert_eq!(q1.status, StepStatus::Failed);
    assert_eq!(q1.attempts, 3); // first execution + two retries

    let failure = report.failure.expect("failure detail");
    assert_eq!(failure.step_id, "q1");
    assert_eq!(failure.kind, FailureKind::RetriesExhausted);
    assert_eq!(failure.attempts, 3);
    assert!(failure.message.starts_with("Retries exhausted after 3 attempts"));

    // Execution halted: the dependent was never started.
    let q2 = report.plan.step("q2").expect("q2 exists");
    assert_eq!(q2.status, StepStatus::Pending);
}

#[tokio::test]
async fn fatal_failure_never_consults_the_corrector() {
    init_logging();
    let engine = FailingEngine::new("permission denied");
    let corrector = StubCorrector::returning("SELECT 1");

    let executor = ExecutorBuilder::new()
        .with_engine(engine.clone())
        .with_corrector(corrector.clone())
        .build()
        .expect("Failed to build executor");

    let plan = Plan::single("SELECT secret FROM vault", None);
    let report = executor.run(plan, None).await.expect("run returns a report");

    assert!(!report.is_success());
    assert_eq!(engine.call_count(), 1);
    assert_eq!(corrector.call_count(), 0);

    let step = report.plan.step("q1").expect("step exists");
    assert_eq!(step.status, StepStatus::Failed);
    assert_eq!(step.attempts, 1);

    let failure = report.failure.expect("failure detail");
    assert_eq!(failure.kind, FailureKind::Fatal);
    assert_eq!(failure.message, "permission denied");
}

#[tokio::test]
async fn continue_independent_runs_siblings_but_not_dependents() {
    init_logging();
    let (_temp_dir, db_path) = seeded_db();

    let plan = Plan::new(
        vec![
            Step::new("q1", "Broken branch", "SELECT nope FROM nowhere"),
            Step::new("q2", "Dependent of broken", "SELECT * FROM q1").with_depends_on(["q1"]),
            Step::new("q3", "Independent", "SELECT COUNT(*) AS n FROM orders"),
        ],
        "q3",
    );

    // Default halt-all policy leaves the siblings pending.
    let halting = ExecutorBuilder::new()
        .with_engine(seeded_engine(&db_path))
        .with_corrector(Arc::new(NoCorrector))
        .build()
        .expect("Failed to build executor");
    let report = halting
        .run(plan.clone(), None)
        .await
        .expect("run returns a report");
    assert_eq!(
        report.plan.step("q3").expect("q3 exists").status,
        StepStatus::Pending
    );
    assert!(report.final_result.is_none());

    // Sibling continuation is an explicit opt-in.
    let continuing = ExecutorBuilder::new()
        .with_engine(seeded_engine(&db_path))
        .with_corrector(Arc::new(NoCorrector))
        .with_failure_policy(FailurePolicy::ContinueIndependent)
        .build()
        .expect("Failed to build executor");
    let report = continuing
        .run(plan, None)
        .await
        .expect("run returns a report");

    assert_eq!(
        report.plan.step("q1").expect("q1 exists").status,
        StepStatus::Failed
    );
    assert_eq!(
        report.plan.step("q2").expect("q2 exists").status,
        StepStatus::Pending
    );
    assert_eq!(
        report.plan.step("q3").expect("q3 exists").status,
        StepStatus::Completed
    );
    // The final step completed, so its table is returned alongside the
    // failure detail.
    assert!(report.final_result.is_some());
    assert!(report.failure.is_some());
    assert!(!report.is_success());
}

#[tokio::test]
async fn structural_violations_abort_before_any_execution() {
    init_logging();
    let engine = FailingEngine::new("should never run");

    let executor = ExecutorBuilder::new()
        .with_engine(engine.clone())
        .with_corrector(Arc::new(NoCorrector))
        .build()
        .expect("Failed to build executor");

    let plan = Plan::new(
        vec![
            Step::new("q1", "a", "SELECT 1").with_depends_on(["q2"]),
            Step::new("q2", "b", "SELECT 2").with_depends_on(["q1"]),
        ],
        "q2",
    );

    let err = executor
        .run(plan, None)
        .await
        .expect_err("cycle must abort the run");

    assert!(matches!(err, RelayError::DependencyCycle { .. }));
    assert!(err.is_structural());
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn report_snapshots_round_trip_as_json() {
    init_logging();
    let (_temp_dir, db_path) = seeded_db();

    let executor = ExecutorBuilder::new()
        .with_engine(seeded_engine(&db_path))
        .with_corrector(Arc::new(NoCorrector))
        .build()
        .expect("Failed to build executor");

    let report = executor
        .run(Plan::single("SELECT COUNT(*) AS n FROM orders", None), None)
        .await
        .expect("run should succeed");

    let json = serde_json::to_string(&report).expect("serialize report");
    let restored: relay_core::PlanReport = serde_json::from_str(&json).expect("deserialize report");
    assert_eq!(restored.plan, report.plan);
    assert_eq!(restored.final_result, report.final_result);
}

#[test]
fn builder_requires_both_collaborators() {
    let err = ExecutorBuilder::new()
        .build()
        .expect_err("missing collaborators");
    assert!(matches!(err, RelayError::Configuration { .. }));

    let err = ExecutorBuilder::new()
        .with_corrector(Arc::new(NoCorrector))
        .build()
        .expect_err("missing engine");
    assert!(matches!(err, RelayError::Configuration { .. }));
}
