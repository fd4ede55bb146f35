//! Conformance testing: run documented examples against the interpreter
//!
//! Every example is executed once, in its own scratch directory, and
//! classified into a [`ConformanceOutcome`]. Classification is first-match:
//!
//! | Condition                                   | Status            |
//! |---------------------------------------------|-------------------|
//! | wall-clock bound exceeded                   | `Timeout`         |
//! | non-zero exit                               | `RuntimeError`    |
//! | stdout is not exactly one JSON value        | `MalformedOutput` |
//! | no expected result                          | `Pass`            |
//! | canonical texts equal                       | `Pass`            |
//! | canonical texts differ                      | `Mismatch`        |
//! | script or scratch files could not be set up | `SetupError`      |
//!
//! Results compare on canonical JSON text (see [`crate::canonical`]), so
//! `6` and `6.0` are different results.
//!
//! Per-example failures are values. Only an interpreter that cannot be
//! launched at all aborts the run with an error.

use crate::canonical::canonical_json;
use crate::error::{Error, Result};
use crate::interpreter::{Interpreter, ScratchDir};
use crate::process::{run_with_timeout, ChildOutput};
use crate::registry::{Expression, Registry};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification of one example run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Pass,
    Mismatch,
    RuntimeError,
    MalformedOutput,
    Timeout,
    SetupError,
}

impl OutcomeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeStatus::Pass => "PASS",
            OutcomeStatus::Mismatch => "MISMATCH",
            OutcomeStatus::RuntimeError => "RUNTIME",
            OutcomeStatus::MalformedOutput => "MALFORMED",
            OutcomeStatus::Timeout => "TIMEOUT",
            OutcomeStatus::SetupError => "SETUP",
        }
    }
}

/// Result of running one example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConformanceOutcome {
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl ConformanceOutcome {
    pub fn passed(&self) -> bool {
        self.status == OutcomeStatus::Pass
    }

    fn failure(status: OutcomeStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            actual_result: None,
            error_detail: Some(detail.into()),
        }
    }

    fn setup_error(detail: impl Into<String>) -> Self {
        Self::failure(OutcomeStatus::SetupError, format!("Setup error: {}", detail.into()))
    }
}

/// One example's outcome with the context needed to report it
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExampleReport {
    pub operator: String,
    /// 1-based position within the operator
    pub index: usize,
    pub name: String,
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    pub outcome: ConformanceOutcome,
}

/// Classify a finished run against the expected result
pub fn classify(output: &ChildOutput, expected: Option<&Value>) -> ConformanceOutcome {
    if output.timed_out {
        return ConformanceOutcome::failure(OutcomeStatus::Timeout, "Execution timeout");
    }

    if output.code != Some(0) {
        let stderr = output.stderr.trim();
        let detail = if stderr.is_empty() {
            match output.code {
                Some(code) => format!("interpreter exited with status {}", code),
                None => "interpreter terminated by signal".to_string(),
            }
        } else {
            stderr.to_string()
        };
        return ConformanceOutcome::failure(OutcomeStatus::RuntimeError, detail);
    }

    let actual: Value = match serde_json::from_str(output.stdout.trim()) {
        Ok(value) => value,
        Err(_) => {
            return ConformanceOutcome::failure(
                OutcomeStatus::MalformedOutput,
                format!("Invalid JSON output: {}", output.stdout),
            )
        }
    };

    let Some(expected) = expected else {
        return ConformanceOutcome {
            status: OutcomeStatus::Pass,
            actual_result: Some(actual),
            error_detail: None,
        };
    };

    let actual_text = canonical_json(&actual);
    let expected_text = canonical_json(expected);
    if actual_text == expected_text {
        ConformanceOutcome {
            status: OutcomeStatus::Pass,
            actual_result: Some(actual),
            error_detail: None,
        }
    } else {
        ConformanceOutcome {
            status: OutcomeStatus::Mismatch,
            actual_result: Some(actual),
            error_detail: Some(format!("Expected {}, got {}", expected_text, actual_text)),
        }
    }
}

/// Runs examples against one interpreter
pub struct Tester {
    interpreter: Interpreter,
    verbose: bool,
}

impl Tester {
    /// Fails when the interpreter binary is missing
    pub fn new(interpreter: Interpreter) -> Result<Self> {
        interpreter.ensure_available()?;
        Ok(Self {
            interpreter,
            verbose: false,
        })
    }

    /// Report scratch cleanup failures on stderr
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Run a single documented example
    pub fn run_example(
        &self,
        expression: &Expression,
        inputs: Option<&[Value]>,
        expected: Option<&Value>,
    ) -> Result<ConformanceOutcome> {
        let script = match expression.to_value() {
            Ok(script) => script,
            Err(e) => {
                return Ok(ConformanceOutcome::setup_error(format!(
                    "expression is not valid JSON: {}",
                    e
                )))
            }
        };
        self.run_script(&[], &script, inputs, expected)
    }

    /// Run `script` with extra interpreter `flags`
    pub fn run_script(
        &self,
        flags: &[String],
        script: &Value,
        inputs: Option<&[Value]>,
        expected: Option<&Value>,
    ) -> Result<ConformanceOutcome> {
        let scratch = match ScratchDir::new(self.verbose) {
            Ok(scratch) => scratch,
            Err(e) => return Ok(ConformanceOutcome::setup_error(e.to_string())),
        };
        let files = match self.interpreter.materialize(&scratch, script, inputs) {
            Ok(files) => files,
            Err(e) => return Ok(ConformanceOutcome::setup_error(e.to_string())),
        };

        let mut cmd = self.interpreter.script_command(flags, &files);
        let output = run_with_timeout(&mut cmd, self.interpreter.timeout)
            .map_err(|e| Error::Interpreter(e.to_string()))?;

        Ok(classify(&output, expected))
    }

    /// Run every example in registry order
    ///
    /// `on_result` sees each report as soon as it is available.
    pub fn run_registry<F>(&self, registry: &Registry, mut on_result: F) -> Result<Vec<ExampleReport>>
    where
        F: FnMut(&ExampleReport),
    {
        let mut reports = Vec::with_capacity(registry.example_count());

        for op in registry.operators() {
            for (i, example) in op.examples.iter().enumerate() {
                let position = i + 1;
                let outcome = self.run_example(
                    &example.expression,
                    example.inputs.as_deref(),
                    example.result.as_ref(),
                )?;

                let report = ExampleReport {
                    operator: op.name.clone(),
                    index: position,
                    name: example.label(position),
                    expression: example.expression.display(),
                    inputs: example.inputs.clone(),
                    expected: example.result.clone(),
                    outcome,
                };
                on_result(&report);
                reports.push(report);
            }
        }

        Ok(reports)
    }
}
