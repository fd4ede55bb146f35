//! CLI command implementations
//!
//! This module contains all CLI command handlers, organized by category:
//! - `check`: Coverage, conformance, and listing commands
//! - `docs`: Reference and index generation
//! - `readme`: README generation
//! - `schema`: JSON Schema output
//! - `util`: Shared utility functions

pub mod check;
pub mod docs;
pub mod readme;
pub mod schema;
pub mod util;

// Re-export all command functions for convenient access
pub use check::{cmd_check, cmd_coverage, cmd_list, cmd_test};
pub use docs::cmd_docs;
pub use readme::cmd_readme;
pub use schema::cmd_schema;

use clap::Args;
use opcheck::{Interpreter, Registry, Result, ToolConfig};
use std::path::PathBuf;

/// Flags shared by every command
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Config file (default: ./opcheck.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Interpreter executable, overriding the config
    #[arg(long, global = true)]
    pub interpreter: Option<PathBuf>,

    /// Operator registry, overriding the config
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Show passing results and debug diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Resolved settings for one invocation
#[derive(Debug)]
pub struct Session {
    pub config: ToolConfig,
    pub json: bool,
    pub verbose: bool,
}

impl GlobalArgs {
    /// Load the config file and apply CLI overrides
    pub fn session(&self) -> Result<Session> {
        let cwd = std::env::current_dir()?;
        let mut config = ToolConfig::discover(self.config.as_deref(), &cwd)?;

        if let Some(path) = &self.interpreter {
            config.interpreter.path = path.clone();
        }
        if let Some(path) = &self.registry {
            config.registry = path.clone();
        }

        Ok(Session {
            config,
            json: self.json,
            verbose: self.verbose,
        })
    }
}

impl Session {
    pub fn interpreter(&self) -> Interpreter {
        Interpreter::from_config(&self.config.interpreter)
    }

    pub fn load_registry(&self) -> Result<Registry> {
        let registry = Registry::load(&self.config.registry)?;
        if self.verbose {
            eprintln!(
                "debug: loaded {} operators ({} examples) from {} [{}]",
                registry.len(),
                registry.example_count(),
                self.config.registry.display(),
                registry.fingerprint()
            );
        }
        Ok(registry)
    }
}
