//! Coverage validation: implemented vs. documented operators

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Agreement between the interpreter and the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CoverageReport {
    pub total_implemented: usize,
    pub total_documented: usize,
    /// Implemented but undocumented, sorted
    pub missing_docs: Vec<String>,
    /// Documented but not implemented, sorted
    pub extra_docs: Vec<String>,
    pub complete: bool,
}

/// Compare the two operator sets
pub fn validate(implemented: &BTreeSet<String>, documented: &BTreeSet<String>) -> CoverageReport {
    let missing_docs: Vec<String> = implemented.difference(documented).cloned().collect();
    let extra_docs: Vec<String> = documented.difference(implemented).cloned().collect();
    let complete = missing_docs.is_empty() && extra_docs.is_empty();

    CoverageReport {
        total_implemented: implemented.len(),
        total_documented: documented.len(),
        missing_docs,
        extra_docs,
        complete,
    }
}

impl CoverageReport {
    /// Format as human-readable report
    pub fn to_report(&self) -> String {
        let mut out = String::new();

        out.push_str("Operator Coverage Report\n");
        out.push_str(&format!("{}\n", "=".repeat(50)));
        out.push_str(&format!("Implemented operators: {}\n", self.total_implemented));
        out.push_str(&format!("Documented operators:  {}\n", self.total_documented));

        if self.complete {
            out.push_str("✓ Coverage is COMPLETE - all operators documented!\n");
        } else {
            out.push_str("✗ Coverage is INCOMPLETE\n");

            if !self.missing_docs.is_empty() {
                out.push_str(&format!(
                    "\nMissing documentation for {} operators:\n",
                    self.missing_docs.len()
                ));
                for op in &self.missing_docs {
                    out.push_str(&format!("  - {}\n", op));
                }
            }

            if !self.extra_docs.is_empty() {
                out.push_str(&format!(
                    "\nExtra documentation for {} operators:\n",
                    self.extra_docs.len()
                ));
                for op in &self.extra_docs {
                    out.push_str(&format!("  - {}\n", op));
                }
            }
        }

        out.push_str(&format!("{}\n", "=".repeat(50)));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_complete() {
        let report = validate(&set(&["+", "map"]), &set(&["map", "+"]));
        assert!(report.complete);
        assert!(report.to_report().contains("COMPLETE"));
    }

    #[test]
    fn test_extra_docs() {
        let report = validate(&set(&["+"]), &set(&["+", "foo"]));
        assert_eq!(report.extra_docs, vec!["foo"]);
        assert!(report.missing_docs.is_empty());
        assert!(!report.complete);
        assert!(report.to_report().contains("Extra documentation for 1 operators"));
    }

    #[test]
    fn test_missing_docs_sorted() {
        let report = validate(&set(&["zip", "+", "car"]), &set(&[]));
        assert_eq!(report.missing_docs, vec!["+", "car", "zip"]);
        assert_eq!(report.total_implemented, 3);
        assert_eq!(report.total_documented, 0);
    }
}
