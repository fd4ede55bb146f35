//! Coverage, conformance, and listing commands

use super::util::emit;
use super::Session;
use opcheck::{
    probe, validate, CoverageReport, ExampleReport, ExampleSummary, PipelineReport, Registry,
    Result, Tester,
};

pub fn cmd_coverage(session: &Session, list_operators: bool) -> Result<()> {
    let interpreter = session.interpreter();
    let implemented = probe(&interpreter)?;

    if list_operators {
        if session.json {
            println!("{}", serde_json::to_string(&implemented)?);
        } else {
            for op in &implemented {
                println!("{}", op);
            }
        }
        return Ok(());
    }

    let registry = session.load_registry()?;
    let report = validate(&implemented, &registry.name_set());
    emit(session, &report, || report.to_report())?;

    if !report.complete {
        return Err("Operator coverage is incomplete".into());
    }
    Ok(())
}

pub fn cmd_test(session: &Session, operator: Option<&str>) -> Result<()> {
    let registry = select(session.load_registry()?, operator)?;
    let examples = run_examples(session, &registry)?;

    let report = PipelineReport::new(registry.fingerprint(), Some(examples), None);
    emit(session, &report, || report.to_report())?;
    finish(&report)
}

pub fn cmd_check(session: &Session) -> Result<()> {
    let registry = session.load_registry()?;

    let implemented = probe(&session.interpreter())?;
    let coverage: CoverageReport = validate(&implemented, &registry.name_set());
    let examples = run_examples(session, &registry)?;

    let report = PipelineReport::new(registry.fingerprint(), Some(examples), Some(coverage));
    emit(session, &report, || report.to_report())?;
    finish(&report)
}

pub fn cmd_list(session: &Session) -> Result<()> {
    let registry = session.load_registry()?;
    println!("{}", serde_json::to_string(&registry.sorted_names())?);
    Ok(())
}

fn finish(report: &PipelineReport) -> Result<()> {
    if report.success {
        Ok(())
    } else {
        Err("Documentation checks failed".into())
    }
}

/// Keep only `operator`'s entry when a filter is given
fn select(registry: Registry, operator: Option<&str>) -> Result<Registry> {
    let Some(name) = operator else {
        return Ok(registry);
    };
    match registry.get(name) {
        Some(op) => Registry::from_operators(vec![op.clone()]),
        None => Err(format!("Operator '{}' is not in the registry", name).into()),
    }
}

fn run_examples(session: &Session, registry: &Registry) -> Result<ExampleSummary> {
    let tester = Tester::new(session.interpreter())?.with_verbose(session.verbose);
    let show_progress = !session.json;

    if show_progress {
        println!("Testing documentation examples");
        println!("{}", "=".repeat(60));
    }

    let mut current = String::new();
    let results = tester.run_registry(registry, |result| {
        if show_progress {
            progress(session, registry, &mut current, result);
        }
    })?;

    if show_progress {
        println!();
    }
    Ok(ExampleSummary::from_results(&results))
}

fn progress(session: &Session, registry: &Registry, current: &mut String, result: &ExampleReport) {
    if *current != result.operator {
        let count = registry
            .get(&result.operator)
            .map(|op| op.examples.len())
            .unwrap_or(0);
        println!("\n{} ({} examples):", result.operator, count);
        current.clone_from(&result.operator);
    }

    let mark = if result.outcome.passed() { "✓" } else { "✗" };
    if result.outcome.passed() {
        println!("  {} {:2}. {}", mark, result.index, result.name);
        if session.verbose {
            if let Some(actual) = &result.outcome.actual_result {
                println!("      Result: {}", actual);
            }
        }
    } else {
        println!(
            "  {} {:2}. {} [{}]",
            mark,
            result.index,
            result.name,
            result.outcome.status.label()
        );
    }
}
