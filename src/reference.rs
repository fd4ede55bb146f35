//! Reference and index assembly
//!
//! Turns the registry into three Markdown artifacts:
//! - the language reference, grouped by category with an "Other" bucket,
//! - an alphabetical index (symbolic names first),
//! - a task-based index using the same category table.
//!
//! Index entries link into the reference by anchor slug, so every operator
//! must have a distinct slug; assembly fails otherwise.

use crate::catalog::{self, default_categories, Category, Grouping};
use crate::error::{Error, Result};
use crate::registry::{OperatorSpec, Registry};
use crate::templates::context::{
    AlphaIndexContext, CategoryContext, OperatorContext, ReferenceContext, TaskIndexContext,
};
use crate::templates::{self, ALPHA_INDEX, REFERENCE, TASK_INDEX};
use crate::util::anchor_collisions;
use minijinja::Environment;
use std::path::Path;

/// The rendered documentation set
#[derive(Debug, Clone)]
pub struct DocSet {
    pub reference: String,
    pub alpha_index: String,
    pub task_index: String,
    /// Non-fatal findings, e.g. category members missing from the registry
    pub warnings: Vec<String>,
}

/// Renders documentation for one registry
pub struct Assembler<'a> {
    registry: &'a Registry,
    categories: Vec<Category>,
    title: String,
    reference_link: String,
    source_name: String,
    env: Environment<'static>,
}

impl<'a> Assembler<'a> {
    pub fn new(registry: &'a Registry) -> Result<Self> {
        Ok(Self {
            registry,
            categories: default_categories(),
            title: "Language Reference".to_string(),
            reference_link: "../LANGUAGE_REFERENCE.md".to_string(),
            source_name: "operators.yaml".to_string(),
            env: templates::engine()?,
        })
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_reference_link(mut self, link: impl Into<String>) -> Self {
        self.reference_link = link.into();
        self
    }

    /// Registry file name mentioned in the reference footer
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn with_template_dir(mut self, dir: Option<&Path>) -> Result<Self> {
        self.env = templates::engine_for(dir)?;
        Ok(self)
    }

    /// Fail when two operators map to the same anchor
    pub fn check_anchors(&self) -> Result<()> {
        let collisions = anchor_collisions(self.registry.names());
        if collisions.is_empty() {
            return Ok(());
        }
        let detail = collisions
            .iter()
            .map(|(slug, names)| format!("#{} <- {}", slug, names.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");
        Err(Error::Render(format!("anchor collision: {}", detail)))
    }

    /// Render all three documents
    pub fn assemble(&self) -> Result<DocSet> {
        self.check_anchors()?;
        let (reference, warnings) = self.reference()?;
        Ok(DocSet {
            reference,
            alpha_index: self.alpha_index()?,
            task_index: self.task_index()?,
            warnings,
        })
    }

    /// The language reference, plus warnings for unknown category members
    pub fn reference(&self) -> Result<(String, Vec<String>)> {
        let grouping = catalog::group(self.registry, &self.categories);
        let warnings = grouping
            .missing
            .iter()
            .map(|name| format!("Operator '{}' not found in registry", name))
            .collect();

        let (categories, other) = contexts(&grouping);
        let ctx = ReferenceContext {
            title: self.title.clone(),
            source: self.source_name.clone(),
            categories,
            other,
            total: self.registry.len(),
        };
        Ok((templates::render(&self.env, REFERENCE, &ctx)?, warnings))
    }

    /// The alphabetical index
    pub fn alpha_index(&self) -> Result<String> {
        let ctx = AlphaIndexContext {
            reference_link: self.reference_link.clone(),
            operators: catalog::alphabetical(self.registry)
                .into_iter()
                .map(OperatorContext::from_operator)
                .collect(),
            total: self.registry.len(),
        };
        templates::render(&self.env, ALPHA_INDEX, &ctx)
    }

    /// The task-based index
    pub fn task_index(&self) -> Result<String> {
        let grouping = catalog::group(self.registry, &self.categories);
        let (categories, other) = contexts(&grouping);
        let ctx = TaskIndexContext {
            reference_link: self.reference_link.clone(),
            categories,
            other,
        };
        templates::render(&self.env, TASK_INDEX, &ctx)
    }
}

fn contexts(grouping: &Grouping<'_>) -> (Vec<CategoryContext>, Vec<OperatorContext>) {
    let categories = grouping
        .categories
        .iter()
        .map(|(category, ops)| CategoryContext {
            name: category.name.clone(),
            operators: operator_contexts(ops),
        })
        .collect();
    (categories, operator_contexts(&grouping.other))
}

fn operator_contexts(ops: &[&OperatorSpec]) -> Vec<OperatorContext> {
    ops.iter().map(|op| OperatorContext::from_operator(op)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"
operators:
  "+":
    description: Addition
    syntax: '["+", a, b]'
    examples:
      - name: Two numbers
        expression: '["+", 2, 3]'
        result: 5
  "$input":
    description: Whole input document
    syntax: '["$input"]'
  alpha:
    syntax: '["alpha"] | pipe'
  Zeta:
    description: Last letter
"#;

    fn registry() -> Registry {
        Registry::from_yaml(REGISTRY).unwrap()
    }

    #[test]
    fn test_reference_sections() {
        let reg = registry();
        let (doc, warnings) = Assembler::new(&reg).unwrap().reference().unwrap();

        assert!(doc.starts_with("# Language Reference"));
        assert!(doc.contains("## Arithmetic Operators"));
        assert!(doc.contains("### `+` - Addition"));
        assert!(doc.contains("**Two numbers:**\n```json\n[\"+\", 2, 3]\n```"));
        assert!(doc.contains("*Result:* `5`"));
        assert!(doc.contains("### `alpha` - No description"));
        assert!(doc.contains("`[\"alpha\"] \\| pipe`"));
        assert!(doc.contains("*Total operators documented: 4*"));

        let other = doc.find("## Other Operators").unwrap();
        let alpha = doc.find("### `alpha`").unwrap();
        let zeta = doc.find("### `Zeta`").unwrap();
        // raw byte order: uppercase sorts first
        assert!(other < zeta && zeta < alpha);
        assert!(doc.find("## Utilities Operators").unwrap() < other);

        assert!(warnings.contains(&"Operator '-' not found in registry".to_string()));
    }

    #[test]
    fn test_alpha_index_order_and_links() {
        let reg = registry();
        let doc = Assembler::new(&reg).unwrap().alpha_index().unwrap();
        let dollar = doc.find("[`$input`](../LANGUAGE_REFERENCE.md#dollarsubinput)").unwrap();
        let plus = doc.find("[`+`](../LANGUAGE_REFERENCE.md#add) - Addition").unwrap();
        let alpha = doc.find("- [`alpha`](../LANGUAGE_REFERENCE.md#alpha) - alpha operator").unwrap();
        let zeta = doc.find("[`Zeta`]").unwrap();
        assert!(dollar < plus && plus < alpha && alpha < zeta);
        assert!(doc.contains("Total: 4 operators"));
    }

    #[test]
    fn test_task_index_uses_categories() {
        let reg = registry();
        let doc = Assembler::new(&reg)
            .unwrap()
            .with_categories(vec![Category {
                name: "Math".into(),
                operators: vec!["+".into()],
            }])
            .with_reference_link("/ref.md")
            .task_index()
            .unwrap();
        assert!(doc.contains("## Math\n"));
        assert!(doc.contains("- [`+`](/ref.md#add) - Addition"));
        let other = doc.find("## Other").unwrap();
        assert!(doc.find("[`$input`]").unwrap() > other);
    }

    #[test]
    fn test_anchor_collision_fails_assembly() {
        let reg = Registry::from_yaml("operators:\n  and: {}\n  \"&\": {}\n").unwrap();
        let err = Assembler::new(&reg).unwrap().assemble().unwrap_err();
        assert!(matches!(err, Error::Render(_)));
        assert!(err.to_string().contains("#and"));
    }

    #[test]
    fn test_assemble_all() {
        let reg = registry();
        let docs = Assembler::new(&reg).unwrap().assemble().unwrap();
        assert!(docs.task_index.contains("# Task-Based Operator Index"));
        assert!(docs.alpha_index.contains("# Alphabetical Operator Index"));
        assert!(!docs.warnings.is_empty());
    }
}
