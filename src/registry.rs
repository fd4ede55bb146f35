//! Operator registry: the documented operator set
//!
//! The registry is the structured documentation source. Every operator has a
//! description, a syntax line, and an ordered list of usage examples that
//! double as conformance tests.
//!
//! ## Example Registry
//!
//! ```yaml
//! operators:
//!   "+":
//!     description: Addition
//!     syntax: '["+", a, b, ...]'
//!     examples:
//!       - name: Two numbers
//!         expression: '["+", 2, 3]'
//!         result: 5
//!   merge:
//!     description: Merge objects
//!     syntax: '["merge", obj1, obj2]'
//!     examples:
//!       - expression: '["merge", ["$input"], {"b": 2}]'
//!         inputs: [{"a": 1}]
//!         result: {"a": 1, "b": 2}
//! ```

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

/// A documented operator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OperatorSpec {
    /// Operator name (the registry key)
    #[serde(skip)]
    pub name: String,

    /// One-line description
    #[serde(default)]
    pub description: String,

    /// Syntax summary
    #[serde(default)]
    pub syntax: String,

    /// Usage examples, in display order
    #[serde(default)]
    pub examples: Vec<ExampleSpec>,
}

/// One usage sample of an operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExampleSpec {
    /// Display label; defaults to `Example <n>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The script to execute
    pub expression: Expression,

    /// Input documents, one file each
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<Value>>,

    /// Expected result; absent (or null) means execution-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

/// Script of an example
///
/// Registries usually store the script pre-serialized so that the exact
/// literal text survives YAML round-trips. A string is therefore always
/// read as serialized JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Expression {
    Serialized(String),
    Structured(Value),
}

impl Expression {
    /// Parse into a JSON value
    pub fn to_value(&self) -> std::result::Result<Value, serde_json::Error> {
        match self {
            Expression::Serialized(text) => serde_json::from_str(text),
            Expression::Structured(value) => Ok(value.clone()),
        }
    }

    /// Text shown in reports and docs
    pub fn display(&self) -> String {
        match self {
            Expression::Serialized(text) => text.trim().to_string(),
            Expression::Structured(value) => value.to_string(),
        }
    }
}

impl ExampleSpec {
    /// Label for the example at 1-based `position`
    pub fn label(&self, position: usize) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Example {}", position),
        }
    }
}

/// Top-level shape of a registry source
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(
    title = "Operator Registry",
    description = "Documented operators with their conformance examples"
)]
pub struct RegistryDocument {
    #[schemars(with = "BTreeMap<String, OperatorSpec>")]
    pub operators: OperatorTable,
}

/// Operators in source order, names guaranteed unique
#[derive(Debug, Default)]
pub struct OperatorTable(pub Vec<OperatorSpec>);

impl<'de> Deserialize<'de> for OperatorTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = OperatorTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of operator name to operator metadata")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut seen = BTreeSet::new();
                let mut operators = Vec::new();
                while let Some(name) = map.next_key::<String>()? {
                    if !seen.insert(name.clone()) {
                        return Err(de::Error::custom(format!(
                            "duplicate operator '{}'",
                            name
                        )));
                    }
                    let mut op: OperatorSpec = map.next_value()?;
                    op.name = name;
                    operators.push(op);
                }
                Ok(OperatorTable(operators))
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// The loaded registry
#[derive(Debug, Clone)]
pub struct Registry {
    operators: Vec<OperatorSpec>,
    index: HashMap<String, usize>,
    fingerprint: String,
}

impl Registry {
    /// Load from a file; `.json` is read as JSON, anything else as YAML
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Load(format!("{}: {}", path.display(), e)))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse a YAML registry
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let doc: RegistryDocument =
            serde_norway::from_str(yaml).map_err(|e| Error::Load(e.to_string()))?;
        Ok(Self::from_document(doc, yaml))
    }

    /// Parse a JSON registry
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: RegistryDocument =
            serde_json::from_str(json).map_err(|e| Error::Load(e.to_string()))?;
        Ok(Self::from_document(doc, json))
    }

    /// Build directly from operators, rejecting duplicate names
    pub fn from_operators(operators: Vec<OperatorSpec>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for op in &operators {
            if !seen.insert(op.name.as_str()) {
                return Err(Error::Load(format!("duplicate operator '{}'", op.name)));
            }
        }
        let source = serde_json::to_string(
            &operators
                .iter()
                .map(|op| (op.name.as_str(), op))
                .collect::<Vec<_>>(),
        )?;
        Ok(Self::from_document(
            RegistryDocument {
                operators: OperatorTable(operators),
            },
            &source,
        ))
    }

    fn from_document(doc: RegistryDocument, source: &str) -> Self {
        let operators = doc.operators.0;
        let index = operators
            .iter()
            .enumerate()
            .map(|(i, op)| (op.name.clone(), i))
            .collect();
        Self {
            operators,
            index,
            fingerprint: fingerprint(source),
        }
    }

    /// Operators in source order
    pub fn operators(&self) -> &[OperatorSpec] {
        &self.operators
    }

    pub fn get(&self, name: &str) -> Option<&OperatorSpec> {
        self.index.get(name).map(|&i| &self.operators[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Operator names in source order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operators.iter().map(|op| op.name.as_str())
    }

    /// Operator names as a sorted set
    pub fn name_set(&self) -> BTreeSet<String> {
        self.names().map(str::to_string).collect()
    }

    /// Operator names, sorted
    pub fn sorted_names(&self) -> Vec<String> {
        self.name_set().into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Total number of documented examples
    pub fn example_count(&self) -> usize {
        self.operators.iter().map(|op| op.examples.len()).sum()
    }

    /// Short content hash of the registry source
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn fingerprint(source: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("sha256:{}", hex::encode(&hasher.finalize()[..8]))
}
