//! Pipeline report: aggregate example and coverage results
//!
//! The pipeline succeeds only when every example passes and coverage is
//! complete. Stages that did not run do not count against it.

use crate::conformance::{ExampleReport, OutcomeStatus};
use crate::coverage::CoverageReport;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts over all examples, with the failing ones
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExampleSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Failures per status label
    pub by_status: BTreeMap<String, usize>,
    pub failures: Vec<ExampleReport>,
}

impl ExampleSummary {
    pub fn from_results(results: &[ExampleReport]) -> Self {
        let mut by_status = BTreeMap::new();
        let mut failures = Vec::new();

        for result in results {
            if result.outcome.status != OutcomeStatus::Pass {
                *by_status
                    .entry(result.outcome.status.label().to_string())
                    .or_insert(0) += 1;
                failures.push(result.clone());
            }
        }

        Self {
            total: results.len(),
            passed: results.len() - failures.len(),
            failed: failures.len(),
            by_status,
            failures,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Final result of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PipelineReport {
    /// Content hash of the registry that was checked
    pub registry_hash: String,

    #[schemars(with = "String")]
    pub generated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<ExampleSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageReport>,

    pub success: bool,
}

impl PipelineReport {
    pub fn new(
        registry_hash: impl Into<String>,
        examples: Option<ExampleSummary>,
        coverage: Option<CoverageReport>,
    ) -> Self {
        let success = examples.as_ref().is_none_or(ExampleSummary::all_passed)
            && coverage.as_ref().is_none_or(|c| c.complete);
        Self {
            registry_hash: registry_hash.into(),
            generated_at: Utc::now(),
            examples,
            coverage,
            success,
        }
    }

    /// Format as human-readable report
    pub fn to_report(&self) -> String {
        let mut out = String::new();

        if let Some(examples) = &self.examples {
            if !examples.failures.is_empty() {
                out.push_str("Failing examples:\n");
                for failure in &examples.failures {
                    out.push_str(&format_failure(failure));
                }
                out.push('\n');
            }

            out.push_str(&format!("{}\n", "=".repeat(60)));
            out.push_str(&format!(
                "Results: {} passed, {} failed, {} total\n",
                examples.passed, examples.failed, examples.total
            ));
            if examples.all_passed() {
                out.push_str("  All examples passed!\n");
            } else {
                let breakdown = examples
                    .by_status
                    .iter()
                    .map(|(status, count)| format!("{} {}", count, status))
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!(
                    "  {} examples failed ({})\n",
                    examples.failed, breakdown
                ));
            }
        }

        if let Some(coverage) = &self.coverage {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&coverage.to_report());
        }

        out.push_str(&format!(
            "\nOverall: {}\n",
            if self.success { "✓ PASSED" } else { "✗ FAILED" }
        ));
        out
    }
}

/// Detail block for one failing example
pub fn format_failure(report: &ExampleReport) -> String {
    let mut out = format!(
        "  ✗ {} {:2}. {} [{}]\n",
        report.operator,
        report.index,
        report.name,
        report.outcome.status.label()
    );
    out.push_str(&format!("      Expression: {}\n", report.expression));
    if let Some(inputs) = report.inputs.as_ref().filter(|inputs| !inputs.is_empty()) {
        out.push_str(&format!(
            "      Inputs: {}\n",
            serde_json::Value::from(inputs.clone())
        ));
    }
    if let Some(expected) = &report.expected {
        out.push_str(&format!("      Expected: {}\n", expected));
    }
    if let Some(detail) = &report.outcome.error_detail {
        out.push_str(&format!("      Error: {}\n", detail));
    }
    out
}
