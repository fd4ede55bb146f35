//! JSON Schema command

use clap::ValueEnum;
use opcheck::readme::ReadmeSource;
use opcheck::registry::RegistryDocument;
use opcheck::{CoverageReport, PipelineReport, Result, ToolConfig};

/// Formats with a published schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaKind {
    /// opcheck.yaml
    Config,
    /// The operator registry
    Registry,
    /// `check`/`test` JSON output
    Report,
    /// `coverage` JSON output
    Coverage,
    /// README.toml
    Readme,
}

pub fn cmd_schema(kind: SchemaKind) -> Result<()> {
    let schema = match kind {
        SchemaKind::Config => schemars::schema_for!(ToolConfig),
        SchemaKind::Registry => schemars::schema_for!(RegistryDocument),
        SchemaKind::Report => schemars::schema_for!(PipelineReport),
        SchemaKind::Coverage => schemars::schema_for!(CoverageReport),
        SchemaKind::Readme => schemars::schema_for!(ReadmeSource),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
