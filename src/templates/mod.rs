//! Template-based documentation rendering
//!
//! Uses MiniJinja templates for the reference document, both indexes, and
//! the README. Templates are embedded by default, with optional override
//! via:
//! - `--template-dir` CLI flag
//! - `opcheck.yaml` config: `docs.template_dir`
//!
//! An override directory only needs the files it replaces; the file names
//! match [`TEMPLATE_NAMES`].

pub mod context;
pub mod filters;

use crate::error::{Error, Result};
use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::path::Path;

// Embedded templates (compiled into binary)
mod embedded {
    pub const REFERENCE: &str = include_str!("../../templates/reference.md.jinja");
    pub const OPERATOR: &str = include_str!("../../templates/operator.md.jinja");
    pub const ALPHA_INDEX: &str = include_str!("../../templates/alpha_index.md.jinja");
    pub const TASK_INDEX: &str = include_str!("../../templates/task_index.md.jinja");
    pub const README: &str = include_str!("../../templates/readme.md.jinja");
}

pub const REFERENCE: &str = "reference.md.jinja";
pub const OPERATOR: &str = "operator.md.jinja";
pub const ALPHA_INDEX: &str = "alpha_index.md.jinja";
pub const TASK_INDEX: &str = "task_index.md.jinja";
pub const README: &str = "readme.md.jinja";

/// Every template the engine knows, by file name
pub const TEMPLATE_NAMES: [&str; 5] = [REFERENCE, OPERATOR, ALPHA_INDEX, TASK_INDEX, README];

/// Template engine with the embedded templates
pub fn engine() -> Result<Environment<'static>> {
    let mut env = Environment::new();

    // Markdown output; never HTML-escape
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);

    filters::register_filters(&mut env);

    env.add_template(REFERENCE, embedded::REFERENCE)?;
    env.add_template(OPERATOR, embedded::OPERATOR)?;
    env.add_template(ALPHA_INDEX, embedded::ALPHA_INDEX)?;
    env.add_template(TASK_INDEX, embedded::TASK_INDEX)?;
    env.add_template(README, embedded::README)?;

    Ok(env)
}

/// Template engine where files in `custom_dir` override embedded templates
pub fn engine_with_override(custom_dir: &Path) -> Result<Environment<'static>> {
    let mut env = engine()?;

    if !custom_dir.is_dir() {
        return Err(Error::Render(format!(
            "template directory not found: {}",
            custom_dir.display()
        )));
    }

    for name in TEMPLATE_NAMES {
        let path = custom_dir.join(name);
        if path.is_file() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                Error::Render(format!("Failed to read {}: {}", path.display(), e))
            })?;
            env.add_template_owned(name, content)?;
        }
    }

    Ok(env)
}

/// Engine for an optional override directory
pub fn engine_for(template_dir: Option<&Path>) -> Result<Environment<'static>> {
    match template_dir {
        Some(dir) => engine_with_override(dir),
        None => engine(),
    }
}

/// Render template `name` with `ctx`
pub fn render<S: Serialize>(env: &Environment<'_>, name: &str, ctx: &S) -> Result<String> {
    let template = env.get_template(name)?;
    Ok(template.render(ctx)?)
}
