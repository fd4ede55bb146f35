//! Conformance tests against a fake interpreter

#![cfg(unix)]

mod common;

use common::{FakeInterpreter, REGISTRY};
use opcheck::{Error, Expression, Interpreter, InvocationShape, OutcomeStatus, Registry, Tester};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

fn expr(text: &str) -> Expression {
    Expression::Serialized(text.to_string())
}

fn tester(fake: &FakeInterpreter) -> Tester {
    Tester::new(fake.interpreter()).unwrap()
}

#[test]
fn test_addition_passes() {
    let fake = FakeInterpreter::new();
    let outcome = tester(&fake)
        .run_example(&expr(r#"["+", 2, 3]"#), None, Some(&json!(5)))
        .unwrap();
    assert_eq!(outcome.status, OutcomeStatus::Pass);
    assert_eq!(outcome.actual_result, Some(json!(5)));
    assert!(outcome.error_detail.is_none());
}

#[test]
fn test_merge_of_two_inputs_ignores_key_order() {
    let fake = FakeInterpreter::new();
    let inputs = [json!({"a": 1}), json!({"b": 2})];
    let outcome = tester(&fake)
        .run_example(
            &expr(r#"["merge", ["$inputs"]]"#),
            Some(&inputs),
            Some(&json!({"a": 1, "b": 2})),
        )
        .unwrap();
    assert_eq!(outcome.status, OutcomeStatus::Pass);

    // script flag, script, then one file per input in order
    let argv = fake.calls().pop().unwrap();
    let args: Vec<&str> = argv.split_whitespace().collect();
    assert_eq!(args[0], "--script");
    assert!(args[1].ends_with("script.json"));
    assert!(args[2].ends_with("input_0.json"));
    assert!(args[3].ends_with("input_1.json"));
}

#[test]
fn test_integer_and_float_results_differ() {
    let fake = FakeInterpreter::new();
    let outcome = tester(&fake)
        .run_example(&expr(r#"["+", 2.5, 3.5]"#), None, Some(&json!(6)))
        .unwrap();
    assert_eq!(outcome.status, OutcomeStatus::Mismatch);
    assert_eq!(outcome.error_detail.as_deref(), Some("Expected 6, got 6.0"));
    assert_eq!(outcome.actual_result, Some(json!(6.0)));
}

#[test]
fn test_execution_only_example_passes() {
    let fake = FakeInterpreter::new();
    let outcome = tester(&fake)
        .run_example(&expr(r#"["+", 2.5, 3.5]"#), None, None)
        .unwrap();
    assert!(outcome.passed());
}

#[test]
fn test_nonzero_exit_is_runtime_error() {
    let fake = FakeInterpreter::new();
    let outcome = tester(&fake)
        .run_example(&expr(r#"["boom"]"#), None, Some(&json!(1)))
        .unwrap();
    assert_eq!(outcome.status, OutcomeStatus::RuntimeError);
    assert_eq!(outcome.error_detail.as_deref(), Some("boom: invalid argument"));
}

#[test]
fn test_unparsable_stdout_is_malformed() {
    let fake = FakeInterpreter::new();
    let outcome = tester(&fake)
        .run_example(&expr(r#"["garbage"]"#), None, None)
        .unwrap();
    assert_eq!(outcome.status, OutcomeStatus::MalformedOutput);
    assert!(outcome
        .error_detail
        .unwrap()
        .starts_with("Invalid JSON output: this is not json"));
}

#[test]
fn test_slow_interpreter_times_out() {
    let fake = FakeInterpreter::new();
    let tester = Tester::new(fake.interpreter().with_timeout(Duration::from_millis(300))).unwrap();

    let started = Instant::now();
    let outcome = tester
        .run_example(&expr(r#"["slow"]"#), None, Some(&json!(null)))
        .unwrap();
    assert_eq!(outcome.status, OutcomeStatus::Timeout);
    assert_eq!(outcome.error_detail.as_deref(), Some("Execution timeout"));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_scratch_files_removed_for_every_status() {
    let fake = FakeInterpreter::new();
    let tester = Tester::new(fake.interpreter().with_timeout(Duration::from_millis(300))).unwrap();
    let inputs = [json!({"a": 1})];

    for script in [r#"["+", 2, 3]"#, r#"["boom"]"#, r#"["garbage"]"#, r#"["slow"]"#] {
        tester
            .run_example(&expr(script), Some(&inputs), Some(&json!(5)))
            .unwrap();
        let script_path = fake.last_script_path();
        let scratch = script_path.parent().unwrap();
        assert!(!scratch.exists(), "{} left behind for {}", scratch.display(), script);
    }
}

#[test]
fn test_runs_are_idempotent() {
    let fake = FakeInterpreter::new();
    let tester = tester(&fake);
    let first = tester
        .run_example(&expr(r#"["+", 2.5, 3.5]"#), None, Some(&json!(6)))
        .unwrap();
    let second = tester
        .run_example(&expr(r#"["+", 2.5, 3.5]"#), None, Some(&json!(6)))
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_expression_never_reaches_interpreter() {
    let fake = FakeInterpreter::new();
    let outcome = tester(&fake)
        .run_example(&expr("[\"+\", 2,"), None, None)
        .unwrap();
    assert_eq!(outcome.status, OutcomeStatus::SetupError);
    assert!(fake.calls().is_empty());
}

#[test]
fn test_default_input_depends_on_shape() {
    let fake = FakeInterpreter::new();
    let count = |shape: InvocationShape| -> Value {
        let tester = Tester::new(fake.interpreter().with_shape(shape)).unwrap();
        tester
            .run_example(&expr(r#"["count"]"#), None, None)
            .unwrap()
            .actual_result
            .unwrap()
    };
    assert_eq!(count(InvocationShape::ScriptFlag), json!(0));
    assert_eq!(count(InvocationShape::Positional), json!(0));
    assert_eq!(count(InvocationShape::PositionalDefaultInput), json!(1));
}

#[test]
fn test_run_registry_in_order() {
    let fake = FakeInterpreter::new();
    let registry = Registry::from_yaml(REGISTRY).unwrap();

    let mut seen = Vec::new();
    let reports = tester(&fake)
        .run_registry(&registry, |report| {
            seen.push(format!("{}#{}", report.operator, report.index))
        })
        .unwrap();

    assert_eq!(seen, vec!["+#1", "+#2", "merge#1"]);
    let statuses: Vec<OutcomeStatus> = reports.iter().map(|r| r.outcome.status).collect();
    assert_eq!(
        statuses,
        vec![OutcomeStatus::Pass, OutcomeStatus::Mismatch, OutcomeStatus::Pass]
    );
    assert_eq!(reports[0].name, "Two numbers");
    assert_eq!(reports[2].name, "Example 1");
    assert_eq!(reports[2].inputs.as_ref().map(Vec::len), Some(2));
}

#[test]
fn test_unlaunchable_interpreter_aborts() {
    let tester = Tester::new(Interpreter::new("opcheck-no-such-interpreter")).unwrap();
    let err = tester
        .run_example(&expr(r#"["+", 2, 3]"#), None, Some(&json!(5)))
        .unwrap_err();
    assert!(matches!(err, Error::Interpreter(_)));
}
