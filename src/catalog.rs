//! Operator categories and index ordering

use crate::registry::{OperatorSpec, Registry};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A named group of operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Category {
    pub name: String,
    pub operators: Vec<String>,
}

impl Category {
    fn new(name: &str, operators: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            operators: operators.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The built-in category table, in display order
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("Arithmetic", &["+", "-", "*", "/", "%"]),
        Category::new("Comparison", &[">", "<", ">=", "<=", "==", "!="]),
        Category::new("Logical", &["and", "or", "not"]),
        Category::new("Data Access", &["$input", "$inputs", "$", "let"]),
        Category::new("Control Flow", &["if", "lambda"]),
        Category::new(
            "Object Operations",
            &["obj", "keys", "values", "objFromPairs", "pick", "omit", "merge"],
        ),
        Category::new(
            "Array Operations",
            &["map", "filter", "reduce", "count", "find", "some", "every"],
        ),
        Category::new("Functional Programming", &["car", "cdr", "cons", "append"]),
        Category::new("String Operations", &["strConcat", "join"]),
        Category::new(
            "Array Manipulation",
            &["sort", "reverse", "unique", "uniqueSorted", "zip"],
        ),
        Category::new("Utilities", &["approx"]),
    ]
}

/// Registry operators grouped by a category table
#[derive(Debug)]
pub struct Grouping<'a> {
    /// Categories in table order, members in table order
    pub categories: Vec<(&'a Category, Vec<&'a OperatorSpec>)>,
    /// Operators in no category, sorted by name
    pub other: Vec<&'a OperatorSpec>,
    /// Category members absent from the registry
    pub missing: Vec<String>,
}

/// Group `registry` by `categories`
///
/// An operator listed in several categories appears in each of them.
pub fn group<'a>(registry: &'a Registry, categories: &'a [Category]) -> Grouping<'a> {
    let mut grouped = Vec::with_capacity(categories.len());
    let mut categorized = BTreeSet::new();
    let mut missing = Vec::new();

    for category in categories {
        let mut members = Vec::new();
        for name in &category.operators {
            categorized.insert(name.as_str());
            match registry.get(name) {
                Some(op) => members.push(op),
                None => missing.push(name.clone()),
            }
        }
        grouped.push((category, members));
    }

    let mut other: Vec<&OperatorSpec> = registry
        .operators()
        .iter()
        .filter(|op| !categorized.contains(op.name.as_str()))
        .collect();
    other.sort_by(|a, b| a.name.cmp(&b.name));

    Grouping {
        categories: grouped,
        other,
        missing,
    }
}

/// Whether `name` starts with a symbol rather than a letter or digit
pub fn is_symbolic(name: &str) -> bool {
    name.chars().next().is_some_and(|c| !c.is_alphanumeric())
}

/// Alphabetical index order
///
/// Symbolic names come first, ordered by raw name. Alphabetic names follow,
/// ordered case-insensitively with the raw name as tie-break.
pub fn index_order(a: &str, b: &str) -> Ordering {
    match (is_symbolic(a), is_symbolic(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => a.cmp(b),
        (false, false) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}

/// Registry operators in alphabetical index order
pub fn alphabetical(registry: &Registry) -> Vec<&OperatorSpec> {
    let mut ops: Vec<&OperatorSpec> = registry.operators().iter().collect();
    ops.sort_by(|a, b| index_order(&a.name, &b.name));
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry(names: &[&str]) -> Registry {
        Registry::from_operators(
            names
                .iter()
                .map(|name| OperatorSpec {
                    name: name.to_string(),
                    ..Default::default()
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_alphabetical_symbols_first() {
        let reg = registry(&["map", "Zip", "+", "$input", "apply", "!=", "car"]);
        let names: Vec<_> = alphabetical(&reg).iter().map(|op| op.name.as_str()).collect();
        assert_eq!(names, vec!["!=", "$input", "+", "apply", "car", "map", "Zip"]);
    }

    #[test]
    fn test_case_insensitive_with_tie_break() {
        assert_eq!(index_order("Map", "map"), Ordering::Less);
        assert_eq!(index_order("b", "A"), Ordering::Greater);
    }

    #[test]
    fn test_group_with_other_bucket() {
        let reg = registry(&["zeta", "+", "map", "alpha", "-"]);
        let categories = default_categories();
        let grouping = group(&reg, &categories);

        let arithmetic = &grouping.categories[0];
        assert_eq!(arithmetic.0.name, "Arithmetic");
        let members: Vec<_> = arithmetic.1.iter().map(|op| op.name.as_str()).collect();
        assert_eq!(members, vec!["+", "-"]);

        let other: Vec<_> = grouping.other.iter().map(|op| op.name.as_str()).collect();
        assert_eq!(other, vec!["alpha", "zeta"]);
        assert!(grouping.missing.contains(&"filter".to_string()));
        assert!(!grouping.missing.contains(&"map".to_string()));
    }

    #[test]
    fn test_default_table_has_no_duplicates() {
        let mut seen = BTreeSet::new();
        for category in default_categories() {
            for op in category.operators {
                assert!(seen.insert(op.clone()), "duplicate {}", op);
            }
        }
    }
}
