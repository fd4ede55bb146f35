//! opcheck tool configuration
//!
//! Settings come from an optional `opcheck.yaml` in the working directory
//! (or the file given with `--config`). Every field has a default, so an
//! empty or missing file is a valid configuration. CLI flags override what
//! the file says.
//!
//! ```yaml
//! interpreter:
//!   path: ./build/computo
//!   invocation: script-flag
//!   timeout_ms: 10000
//! registry: docs/operators.yaml
//! docs:
//!   reference: docs/LANGUAGE_REFERENCE.md
//! ```

use crate::catalog::Category;
use crate::error::{Error, Result};
use crate::interpreter::InvocationShape;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "opcheck.yaml";

/// Root configuration (`opcheck.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "opcheck configuration")]
pub struct ToolConfig {
    /// How to invoke the interpreter under test
    #[serde(default)]
    pub interpreter: InterpreterConfig,

    /// Operator registry source (YAML or JSON)
    #[serde(default = "default_registry")]
    pub registry: PathBuf,

    /// Reference documentation output
    #[serde(default)]
    pub docs: DocsConfig,

    /// README generation
    #[serde(default)]
    pub readme: ReadmeConfig,
}

fn default_registry() -> PathBuf {
    PathBuf::from("docs/operators.yaml")
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            interpreter: InterpreterConfig::default(),
            registry: default_registry(),
            docs: DocsConfig::default(),
            readme: ReadmeConfig::default(),
        }
    }
}

/// Interpreter invocation settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InterpreterConfig {
    /// Interpreter executable
    #[serde(default = "default_interpreter_path")]
    pub path: PathBuf,

    /// Arguments placed before everything else (e.g. a wrapper's own flags)
    #[serde(default)]
    pub args: Vec<String>,

    /// Argument layout for example runs
    #[serde(default)]
    pub invocation: InvocationShape,

    /// Flag preceding the script file in `script-flag` layout
    #[serde(default = "default_script_flag")]
    pub script_flag: String,

    /// Introspection flag printing the implemented operators
    #[serde(default = "default_list_operators_flag")]
    pub list_operators_flag: String,

    /// Wall-clock bound per example run
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Wall-clock bound for the operator probe
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

fn default_interpreter_path() -> PathBuf {
    PathBuf::from("./build/computo")
}

fn default_script_flag() -> String {
    "--script".to_string()
}

fn default_list_operators_flag() -> String {
    "--list-operators".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_probe_timeout_ms() -> u64 {
    30_000
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            path: default_interpreter_path(),
            args: Vec::new(),
            invocation: InvocationShape::default(),
            script_flag: default_script_flag(),
            list_operators_flag: default_list_operators_flag(),
            timeout_ms: default_timeout_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

/// Reference documentation settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocsConfig {
    /// Heading of the reference document
    #[serde(default = "default_title")]
    pub title: String,

    /// Reference document path
    #[serde(default = "default_reference_path")]
    pub reference: PathBuf,

    /// Alphabetical index path
    #[serde(default = "default_alpha_path")]
    pub alpha_index: PathBuf,

    /// Task-based index path
    #[serde(default = "default_task_path")]
    pub task_index: PathBuf,

    /// Link target of index entries, relative to the index pages
    #[serde(default = "default_reference_link")]
    pub reference_link: String,

    /// Directory with template overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,

    /// Category table replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
}

fn default_title() -> String {
    "Language Reference".to_string()
}

fn default_reference_path() -> PathBuf {
    PathBuf::from("docs/LANGUAGE_REFERENCE.md")
}

fn default_alpha_path() -> PathBuf {
    PathBuf::from("docs/alpha/index.md")
}

fn default_task_path() -> PathBuf {
    PathBuf::from("docs/task/index.md")
}

fn default_reference_link() -> String {
    "../LANGUAGE_REFERENCE.md".to_string()
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            reference: default_reference_path(),
            alpha_index: default_alpha_path(),
            task_index: default_task_path(),
            reference_link: default_reference_link(),
            template_dir: None,
            categories: None,
        }
    }
}

/// README generation settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadmeConfig {
    #[serde(default = "default_readme_source")]
    pub source: PathBuf,

    #[serde(default = "default_readme_output")]
    pub output: PathBuf,
}

fn default_readme_source() -> PathBuf {
    PathBuf::from("README.toml")
}

fn default_readme_output() -> PathBuf {
    PathBuf::from("README.md")
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            source: default_readme_source(),
            output: default_readme_output(),
        }
    }
}

impl ToolConfig {
    /// Load from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse YAML; an empty document yields the defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_norway::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Resolve the configuration to use
    ///
    /// An explicit path must exist. Otherwise `opcheck.yaml` in `dir` is
    /// used when present, and the defaults when not.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
