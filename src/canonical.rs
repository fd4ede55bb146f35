//! Canonical JSON text used as the equality basis for example results
//!
//! Object keys are sorted recursively; everything else is rendered exactly as
//! parsed. Numbers keep their literal text (serde_json `arbitrary_precision`):
//! `6` and `6.0` render differently and therefore never compare equal, and
//! integers beyond 64 bits stay exact. The integer `-0` is the integer zero
//! and renders as `0`.

use serde_json::Value;

/// Render `value` as compact JSON with sorted object keys
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Compare two values on their canonical text
pub fn canonical_eq(a: &Value, b: &Value) -> bool {
    canonical_json(a) == canonical_json(b)
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            out.push_str(if text == "-0" { "0" } else { &text });
        }
        Value::Null | Value::Bool(_) | Value::String(_) => {
            out.push_str(&value.to_string());
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_value(out, item);
            }
            out.push('}');
        }
    }
}
