//! README generation from a TOML example catalogue
//!
//! `README.toml` holds project metadata, an intro paragraph, and a list of
//! worked examples. Examples are rendered grouped by category. Examples run
//! with a debugging flag get a live **Debug Output** block captured from the
//! interpreter's stderr.

use crate::error::{Error, Result};
use crate::interpreter::{Interpreter, InvocationShape, ScratchDir};
use crate::process::run_with_timeout;
use crate::templates::{self, README};
use crate::util::{title_case, truncate_lines};
use minijinja::Environment;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Flags that make the interpreter write diagnostics worth showing
const DEBUG_FLAG_PATTERN: &str =
    r"--(debug|trace|profile|interactive|break-on|watch|slow-threshold|debug-level)";

/// Captured debug output keeps this many lines
pub const DEBUG_OUTPUT_LINES: usize = 15;

pub const DONTRUN_NOTE: &str = "# Example marked with dontrun=true - execution skipped";

/// Parsed `README.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReadmeSource {
    #[serde(default)]
    pub meta: ReadmeMeta,

    #[serde(default)]
    pub intro: ReadmeIntro,

    #[serde(default)]
    pub examples: Vec<ReadmeExample>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadmeMeta {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    #[serde(default)]
    pub human_docs_url: Option<String>,

    #[serde(default)]
    pub human_docs_repo: Option<String>,
}

impl Default for ReadmeMeta {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: String::new(),
            human_docs_url: None,
            human_docs_repo: None,
        }
    }
}

fn default_title() -> String {
    "Computo".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReadmeIntro {
    #[serde(default)]
    pub description: String,
}

/// One worked example
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadmeExample {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_category")]
    pub category: String,

    pub script: Value,

    /// Single input document
    #[serde(default)]
    pub input: Option<Value>,

    /// Several input documents; takes precedence over `input`
    #[serde(default)]
    pub inputs: Option<Vec<Value>>,

    #[serde(default)]
    pub flags: Option<Vec<String>>,

    pub expected: Value,

    /// Never execute; show a fixed note instead of debug output
    #[serde(default)]
    pub dontrun: bool,

    /// Hand-written debug output, shown verbatim
    #[serde(default)]
    pub manualrun: Option<String>,
}

fn default_category() -> String {
    "misc".to_string()
}

impl ReadmeExample {
    /// Input documents handed to the interpreter
    pub fn input_documents(&self) -> Option<Vec<Value>> {
        match (&self.inputs, &self.input) {
            (Some(inputs), _) => Some(inputs.clone()),
            (None, Some(input)) => Some(vec![input.clone()]),
            (None, None) => None,
        }
    }
}

impl ReadmeSource {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Readme(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Intro text with `{human_docs_url}` / `{human_docs_repo}` filled in
    ///
    /// Placeholders are only substituted when `human_docs_url` is set.
    pub fn intro_text(&self) -> String {
        let text = self.intro.description.clone();
        let Some(url) = &self.meta.human_docs_url else {
            return text;
        };
        let repo = self.meta.human_docs_repo.as_deref().unwrap_or("#");
        text.replace("{human_docs_url}", url)
            .replace("{human_docs_repo}", repo)
    }

    /// Examples grouped by category, categories sorted, file order within
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&ReadmeExample>> {
        let mut groups: BTreeMap<&str, Vec<&ReadmeExample>> = BTreeMap::new();
        for example in &self.examples {
            groups.entry(example.category.as_str()).or_default().push(example);
        }
        groups
    }
}

#[derive(Debug, Serialize)]
struct ReadmeContext {
    title: String,
    subtitle: String,
    intro: String,
    interpreter: String,
    source: String,
    categories: Vec<ReadmeCategoryContext>,
}

#[derive(Debug, Serialize)]
struct ReadmeCategoryContext {
    title: String,
    examples: Vec<ReadmeExampleContext>,
}

#[derive(Debug, Serialize)]
struct ReadmeExampleContext {
    title: String,
    description: String,
    script: String,
    input: Option<String>,
    inputs: Option<Vec<String>>,
    flags: Option<String>,
    debug_output: Option<String>,
    expected: String,
}

/// Renders a [`ReadmeSource`] into Markdown
pub struct ReadmeGenerator {
    interpreter: Option<Interpreter>,
    debug_flags: Regex,
    env: Environment<'static>,
    source_name: String,
    verbose: bool,
}

impl ReadmeGenerator {
    /// `interpreter` is used for live debug output; `None` omits those blocks
    ///
    /// The interpreter is always called positionally with a `{}` default
    /// input, whatever its configured layout.
    pub fn new(interpreter: Option<Interpreter>) -> Result<Self> {
        let debug_flags = Regex::new(DEBUG_FLAG_PATTERN)
            .map_err(|e| Error::Readme(format!("invalid debug flag pattern: {}", e)))?;
        Ok(Self {
            interpreter: interpreter
                .map(|interp| interp.with_shape(InvocationShape::PositionalDefaultInput)),
            debug_flags,
            env: templates::engine()?,
            source_name: "README.toml".to_string(),
            verbose: false,
        })
    }

    pub fn with_template_dir(mut self, dir: Option<&Path>) -> Result<Self> {
        self.env = templates::engine_for(dir)?;
        Ok(self)
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn has_debug_flags(&self, example: &ReadmeExample) -> bool {
        example
            .flags
            .iter()
            .flatten()
            .any(|flag| self.debug_flags.is_match(flag))
    }

    /// Debug block text for `example`, if it gets one
    pub fn debug_output(&self, example: &ReadmeExample) -> Option<String> {
        if example.manualrun.is_none() && !self.has_debug_flags(example) {
            return None;
        }
        if example.dontrun {
            return Some(DONTRUN_NOTE.to_string());
        }
        if let Some(manual) = &example.manualrun {
            return Some(manual.trim().to_string());
        }

        let stderr = self.capture_stderr(example)?;
        let stderr = stderr.trim();
        if stderr.is_empty() {
            None
        } else {
            Some(truncate_lines(stderr, DEBUG_OUTPUT_LINES))
        }
    }

    /// Run `example` and keep stderr, whether or not it succeeded
    fn capture_stderr(&self, example: &ReadmeExample) -> Option<String> {
        let interpreter = self.interpreter.as_ref()?;
        let scratch = ScratchDir::new(self.verbose).ok()?;
        let inputs = example.input_documents();
        let files = interpreter
            .materialize(&scratch, &example.script, inputs.as_deref())
            .ok()?;

        let flags = example.flags.clone().unwrap_or_default();
        let mut cmd = interpreter.script_command(&flags, &files);
        let output = run_with_timeout(&mut cmd, interpreter.timeout).ok()?;
        if output.timed_out {
            return None;
        }
        Some(output.stderr)
    }

    pub fn render(&self, source: &ReadmeSource) -> Result<String> {
        let mut categories = Vec::new();
        for (category, examples) in source.by_category() {
            let mut contexts = Vec::with_capacity(examples.len());
            for example in examples {
                contexts.push(self.example_context(example)?);
            }
            categories.push(ReadmeCategoryContext {
                title: title_case(category),
                examples: contexts,
            });
        }

        let interpreter = self
            .interpreter
            .as_ref()
            .map(|interp| interp.program.display().to_string())
            .unwrap_or_else(|| "computo".to_string());

        let ctx = ReadmeContext {
            title: source.meta.title.clone(),
            subtitle: source.meta.subtitle.clone(),
            intro: source.intro_text(),
            interpreter,
            source: self.source_name.clone(),
            categories,
        };
        templates::render(&self.env, README, &ctx)
    }

    fn example_context(&self, example: &ReadmeExample) -> Result<ReadmeExampleContext> {
        let inputs = match &example.inputs {
            Some(inputs) => Some(inputs.iter().map(pretty).collect::<Result<Vec<_>>>()?),
            None => None,
        };
        let input = match &example.input {
            Some(input) if inputs.is_none() && !is_empty_document(input) => Some(pretty(input)?),
            _ => None,
        };

        Ok(ReadmeExampleContext {
            title: title_case(&example.name),
            description: example.description.clone(),
            script: pretty(&example.script)?,
            input,
            inputs,
            flags: example.flags.as_ref().map(|flags| flags.join(" ")),
            debug_output: self.debug_output(example),
            expected: pretty(&example.expected)?,
        })
    }
}

fn pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
