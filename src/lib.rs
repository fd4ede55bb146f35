// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # opcheck - operator documentation conformance
//!
//! Keeps an expression-language interpreter and its operator documentation
//! in agreement.
//!
//! ## Core Concept
//!
//! The **operator registry** (`operators.yaml`) is the source of truth for
//! documentation. Every operator entry carries a description, a syntax line,
//! and worked examples with expected results. From the registry, opcheck can:
//!
//! - **Validate coverage**: every implemented operator is documented, and
//!   nothing is documented that the interpreter does not implement
//! - **Test conformance**: run every example through the real interpreter and
//!   compare results on canonical JSON text
//! - **Assemble documentation**: a categorized reference plus alphabetical and
//!   task-based indexes linking into it
//! - **Generate a README** from a TOML example catalogue, with live debug
//!   output
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use opcheck::{probe, validate, Interpreter, Registry, Tester};
//!
//! let registry = Registry::load("docs/operators.yaml".as_ref())?;
//! let interpreter = Interpreter::new("./build/computo");
//!
//! let coverage = validate(&probe(&interpreter)?, &registry.name_set());
//! println!("{}", coverage.to_report());
//!
//! let tester = Tester::new(interpreter)?;
//! for report in tester.run_registry(&registry, |_| {})? {
//!     if !report.outcome.passed() {
//!         println!("✗ {} {}", report.operator, report.name);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │  REGISTRY (YAML / JSON)                                     │
//! │       │                                                     │
//! │       ├──► validate(implemented, documented) ──► Coverage   │
//! │       │            ▲                                        │
//! │       │            └── probe(interpreter)                   │
//! │       │                                                     │
//! │       ├──► Tester::run_registry ──► ExampleReport*          │
//! │       │                                                     │
//! │       └──► Assembler::assemble ──► reference + indexes      │
//! │                                                             │
//! │  README.toml ──► ReadmeGenerator::render ──► README.md      │
//! │                                                             │
//! │  Coverage + ExampleReport* ──► PipelineReport ──► exit code │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod canonical;
pub mod catalog;
pub mod config;
pub mod conformance;
pub mod coverage;
pub mod error;
pub mod interpreter;
pub mod probe;
pub mod process;
pub mod readme;
pub mod reference;
pub mod registry;
pub mod report;
pub mod templates;
pub mod util;

// Re-exports
pub use canonical::{canonical_eq, canonical_json};
pub use catalog::{default_categories, Category};
pub use config::{DocsConfig, InterpreterConfig, ReadmeConfig, ToolConfig};
pub use conformance::{classify, ConformanceOutcome, ExampleReport, OutcomeStatus, Tester};
pub use coverage::{validate, CoverageReport};
pub use error::{Error, Result};
pub use interpreter::{Interpreter, InvocationShape, ScratchDir};
pub use probe::probe;
pub use readme::{ReadmeGenerator, ReadmeSource};
pub use reference::{Assembler, DocSet};
pub use registry::{ExampleSpec, Expression, OperatorSpec, Registry};
pub use report::{ExampleSummary, PipelineReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
