//! Template contexts for reference and index generation
//!
//! Contexts carry display-ready strings. JSON values are serialized here
//! rather than in templates so the text matches what reports print.

use crate::registry::{ExampleSpec, OperatorSpec};
use serde::Serialize;

/// One example block
#[derive(Debug, Clone, Serialize)]
pub struct ExampleContext {
    pub label: String,
    pub expression: String,
    /// Serialized inputs; absent when there are none
    pub inputs: Option<String>,
    /// Serialized expected result
    pub result: Option<String>,
}

impl ExampleContext {
    pub fn from_example(example: &ExampleSpec, position: usize) -> Self {
        Self {
            label: example.label(position),
            expression: example.expression.display(),
            inputs: example
                .inputs
                .as_ref()
                .filter(|inputs| !inputs.is_empty())
                .map(|inputs| serde_json::Value::from(inputs.clone()).to_string()),
            result: example.result.as_ref().map(|value| value.to_string()),
        }
    }
}

/// One operator section or index entry
#[derive(Debug, Clone, Serialize)]
pub struct OperatorContext {
    pub name: String,
    pub description: String,
    pub syntax: String,
    /// Index entry text: the description, or `<name> operator`
    pub summary: String,
    pub examples: Vec<ExampleContext>,
}

impl OperatorContext {
    pub fn from_operator(op: &OperatorSpec) -> Self {
        let summary = if op.description.trim().is_empty() {
            format!("{} operator", op.name)
        } else {
            op.description.clone()
        };
        Self {
            name: op.name.clone(),
            description: op.description.clone(),
            syntax: op.syntax.clone(),
            summary,
            examples: op
                .examples
                .iter()
                .enumerate()
                .map(|(i, ex)| ExampleContext::from_example(ex, i + 1))
                .collect(),
        }
    }
}

/// A category with its resolved operators
#[derive(Debug, Clone, Serialize)]
pub struct CategoryContext {
    pub name: String,
    pub operators: Vec<OperatorContext>,
}

/// Reference document
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceContext {
    pub title: String,
    pub source: String,
    pub categories: Vec<CategoryContext>,
    pub other: Vec<OperatorContext>,
    pub total: usize,
}

/// Alphabetical index
#[derive(Debug, Clone, Serialize)]
pub struct AlphaIndexContext {
    pub reference_link: String,
    pub operators: Vec<OperatorContext>,
    pub total: usize,
}

/// Task-based index
#[derive(Debug, Clone, Serialize)]
pub struct TaskIndexContext {
    pub reference_link: String,
    pub categories: Vec<CategoryContext>,
    pub other: Vec<OperatorContext>,
}
