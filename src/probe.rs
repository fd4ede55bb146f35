//! Implemented-operator probe
//!
//! Asks the interpreter which operators it implements via its introspection
//! flag. The answer must be a single JSON array of strings.

use crate::error::{Error, Result};
use crate::interpreter::Interpreter;
use crate::process::run_with_timeout;
use serde_json::Value;
use std::collections::BTreeSet;

/// Operator names reported by the interpreter
pub fn probe(interpreter: &Interpreter) -> Result<BTreeSet<String>> {
    let mut cmd = interpreter.list_operators_command();
    let out = run_with_timeout(&mut cmd, interpreter.probe_timeout)
        .map_err(|e| Error::Probe(e.to_string()))?;

    if out.timed_out {
        return Err(Error::Probe(format!(
            "{} {} did not finish within {:?}",
            interpreter.program.display(),
            interpreter.list_operators_flag,
            interpreter.probe_timeout
        )));
    }
    if !out.success() {
        let code = out
            .code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".into());
        return Err(Error::Probe(format!(
            "interpreter exited with {}: {}",
            code,
            out.stderr.trim()
        )));
    }

    parse_operator_list(&out.stdout)
}

/// Parse introspection output into a name set
pub fn parse_operator_list(stdout: &str) -> Result<BTreeSet<String>> {
    let value: Value = serde_json::from_str(stdout.trim())
        .map_err(|e| Error::Probe(format!("operator list is not JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::Probe(format!(
                "expected a JSON array of operator names, got {}",
                other
            )))
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(name) => Ok(name),
            other => Err(Error::Probe(format!(
                "operator list entry is not a string: {}",
                other
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operator_list() {
        let ops = parse_operator_list("[\"+\", \"map\", \"$input\"]\n").unwrap();
        assert_eq!(ops.len(), 3);
        assert!(ops.contains("$input"));
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert!(matches!(parse_operator_list("{}"), Err(Error::Probe(_))));
        assert!(matches!(parse_operator_list("[1, 2]"), Err(Error::Probe(_))));
        assert!(matches!(parse_operator_list("+ map"), Err(Error::Probe(_))));
        assert!(matches!(parse_operator_list(""), Err(Error::Probe(_))));
    }

    #[test]
    fn test_missing_interpreter() {
        let err = probe(&Interpreter::new("/nonexistent/computo")).unwrap_err();
        assert!(matches!(err, Error::Probe(_)));
    }
}
