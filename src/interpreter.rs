//! Interpreter invocation: argument layout and scratch files
//!
//! Scripts and input documents reach the interpreter as files. Each run
//! gets its own [`ScratchDir`], which is removed when the guard drops, on
//! every exit path.

use crate::config::InterpreterConfig;
use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;

/// Argument layout of an execution-mode call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum InvocationShape {
    /// `<flag> <script> [input ...]`
    #[default]
    ScriptFlag,
    /// `<script> [input ...]`
    Positional,
    /// `<script> <input> [input ...]`; a `{}` input is supplied when the
    /// example has none
    PositionalDefaultInput,
}

/// The interpreter under test
#[derive(Debug, Clone)]
pub struct Interpreter {
    pub program: PathBuf,
    pub leading_args: Vec<String>,
    pub shape: InvocationShape,
    pub script_flag: String,
    pub list_operators_flag: String,
    pub timeout: Duration,
    pub probe_timeout: Duration,
}

impl Interpreter {
    /// Interpreter at `program` with default settings
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self::from_config(&InterpreterConfig {
            path: program.into(),
            ..Default::default()
        })
    }

    pub fn from_config(config: &InterpreterConfig) -> Self {
        Self {
            program: config.path.clone(),
            leading_args: config.args.clone(),
            shape: config.invocation,
            script_flag: config.script_flag.clone(),
            list_operators_flag: config.list_operators_flag.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
        }
    }

    pub fn with_shape(mut self, shape: InvocationShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fail early when a path-like program does not exist
    ///
    /// Bare names (`computo`) are resolved through `PATH` at spawn time and
    /// are not checked here.
    pub fn ensure_available(&self) -> Result<()> {
        let path_like = self.program.components().count() > 1 || self.program.is_absolute();
        if path_like && !self.program.exists() {
            return Err(Error::Interpreter(format!(
                "interpreter binary not found: {}",
                self.program.display()
            )));
        }
        Ok(())
    }

    /// Execution-mode arguments, after the leading args
    pub fn script_args(&self, flags: &[String], script: &Path, inputs: &[PathBuf]) -> Vec<OsString> {
        let mut args: Vec<OsString> = flags.iter().map(OsString::from).collect();
        if self.shape == InvocationShape::ScriptFlag {
            args.push(OsString::from(&self.script_flag));
        }
        args.push(script.as_os_str().to_os_string());
        args.extend(inputs.iter().map(|p| p.as_os_str().to_os_string()));
        args
    }

    /// Command for an execution-mode run
    pub fn script_command(&self, flags: &[String], files: &ScriptFiles) -> Command {
        let mut cmd = self.base_command();
        cmd.args(self.script_args(flags, &files.script, &files.inputs));
        cmd
    }

    /// Command for the introspection call
    pub fn list_operators_command(&self) -> Command {
        let mut cmd = self.base_command();
        cmd.arg(&self.list_operators_flag);
        cmd
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args);
        cmd
    }

    /// Write script and inputs into `scratch` following this layout
    pub fn materialize(
        &self,
        scratch: &ScratchDir,
        script: &Value,
        inputs: Option<&[Value]>,
    ) -> std::io::Result<ScriptFiles> {
        let script_path = scratch.write_json("script.json", script)?;

        let default_input = [Value::Object(Default::default())];
        let inputs = match (inputs, self.shape) {
            (Some(inputs), _) => inputs,
            (None, InvocationShape::PositionalDefaultInput) => &default_input[..],
            (None, _) => &[],
        };

        let mut input_paths = Vec::with_capacity(inputs.len());
        for (i, input) in inputs.iter().enumerate() {
            input_paths.push(scratch.write_json(&format!("input_{}.json", i), input)?);
        }

        Ok(ScriptFiles {
            script: script_path,
            inputs: input_paths,
        })
    }
}

/// Files handed to one interpreter run
#[derive(Debug, Clone)]
pub struct ScriptFiles {
    pub script: PathBuf,
    pub inputs: Vec<PathBuf>,
}

/// Per-run temporary directory, removed on drop
pub struct ScratchDir {
    dir: Option<TempDir>,
    verbose: bool,
}

impl ScratchDir {
    /// Create a fresh directory; `verbose` reports cleanup failures
    pub fn new(verbose: bool) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("opcheck-").tempdir()?;
        Ok(Self {
            dir: Some(dir),
            verbose,
        })
    }

    pub fn path(&self) -> &Path {
        match &self.dir {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    /// Serialize `value` into `name` inside the directory
    pub fn write_json(&self, name: &str, value: &Value) -> std::io::Result<PathBuf> {
        let path = self.path().join(name);
        let text = serde_json::to_string(value)?;
        std::fs::write(&path, text)?;
        Ok(path)
    }
}

impl Drop for ScratchDir {
    #[allow(clippy::print_stderr)]
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                if self.verbose {
                    eprintln!(
                        "debug: failed to remove scratch dir {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }
    }
}
