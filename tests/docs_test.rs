//! Registry loading and documentation assembly

use opcheck::catalog::{alphabetical, default_categories};
use opcheck::util::{anchor_collisions, anchor_slug};
use opcheck::{Assembler, Category, Error, Registry};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const REGISTRY_YAML: &str = r#"
operators:
  map:
    description: Apply a lambda to each element
    syntax: '["map", array, lambda]'
    examples:
      - name: Double
        expression: '["map", {"array": [1, 2]}, ["lambda", ["x"], ["*", ["$", "/x"], 2]]]'
        result: {"array": [2, 4]}
  "!=":
    description: Not equal
    syntax: '["!=", a, b]'
  "$input":
    description: Whole input
    syntax: '["$input"]'
    examples:
      - expression: '["$input"]'
        inputs: [{"x": 1}]
        result: {"x": 1}
  car:
    syntax: '["car", array]'
"#;

#[test]
fn test_yaml_and_json_registries_agree() {
    let dir = TempDir::new().unwrap();
    let yaml_path = dir.path().join("operators.yaml");
    std::fs::write(&yaml_path, REGISTRY_YAML).unwrap();
    let yaml = Registry::load(&yaml_path).unwrap();

    let json_path = dir.path().join("operators.json");
    std::fs::write(
        &json_path,
        r#"{"operators": {"map": {"description": "Apply a lambda to each element"}, "!=": {}, "$input": {}, "car": {}}}"#,
    )
    .unwrap();
    let json = Registry::load(&json_path).unwrap();

    assert_eq!(yaml.names().collect::<Vec<_>>(), json.names().collect::<Vec<_>>());
    assert_eq!(yaml.names().collect::<Vec<_>>(), vec!["map", "!=", "$input", "car"]);
    assert_eq!(yaml.example_count(), 2);
    assert!(yaml.fingerprint().starts_with("sha256:"));
}

#[test]
fn test_registry_load_errors() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Registry::load(&dir.path().join("absent.yaml")),
        Err(Error::Load(_))
    ));
    assert!(matches!(
        Registry::from_yaml("version: 1\n"),
        Err(Error::Load(_))
    ));
    let err = Registry::from_json(r#"{"operators": {"map": {}, "map": {}}}"#).unwrap_err();
    assert!(err.to_string().contains("map"));
}

#[test]
fn test_write_full_doc_set() {
    let registry = Registry::from_yaml(REGISTRY_YAML).unwrap();
    let docs = Assembler::new(&registry)
        .unwrap()
        .with_source_name("operators.yaml")
        .assemble()
        .unwrap();

    assert!(docs.reference.contains("## Comparison Operators\n\n### `!=` - Not equal"));
    assert!(docs.reference.contains("## Data Access Operators\n\n### `$input` - Whole input"));
    assert!(docs.reference.contains("### `car` - No description"));
    assert!(docs
        .reference
        .contains("*This documentation was automatically generated from `operators.yaml`"));
    assert!(!docs.reference.contains("## Other Operators"));

    let alpha_lines: Vec<&str> = docs
        .alpha_index
        .lines()
        .filter(|line| line.starts_with("- "))
        .collect();
    assert_eq!(
        alpha_lines,
        vec![
            "- [`!=`](../LANGUAGE_REFERENCE.md#notsubequal) - Not equal",
            "- [`$input`](../LANGUAGE_REFERENCE.md#dollarsubinput) - Whole input",
            "- [`car`](../LANGUAGE_REFERENCE.md#car) - car operator",
            "- [`map`](../LANGUAGE_REFERENCE.md#map) - Apply a lambda to each element",
        ]
    );

    assert!(docs.task_index.contains("## Functional Programming\n"));
    assert!(docs
        .task_index
        .contains("- [`car`](../LANGUAGE_REFERENCE.md#car) - car operator"));
}

#[test]
fn test_custom_categories_and_template_dir() {
    let registry = Registry::from_yaml(REGISTRY_YAML).unwrap();
    let templates = TempDir::new().unwrap();
    std::fs::write(
        templates.path().join("task_index.md.jinja"),
        "{% for c in categories %}[{{ c.name }}:{% for op in c.operators %} {{ op.name | anchor }}{% endfor %}]{% endfor %}[other:{% for op in other %} {{ op.name }}{% endfor %}]",
    )
    .unwrap();

    let out = Assembler::new(&registry)
        .unwrap()
        .with_categories(vec![Category {
            name: "Lists".into(),
            operators: vec!["map".into(), "car".into()],
        }])
        .with_template_dir(Some(templates.path()))
        .unwrap()
        .task_index()
        .unwrap();

    assert_eq!(out, "[Lists: map car][other: != $input]");
}

#[test]
fn test_default_table_anchor_exactness() {
    let names: Vec<String> = default_categories()
        .into_iter()
        .flat_map(|c| c.operators)
        .collect();
    assert!(anchor_collisions(names.iter().map(String::as_str)).is_empty());

    let expected = [
        ("%", "mod"),
        (">=", "greaterequal"),
        ("==", "equalequal"),
        ("$inputs", "dollarsubinputs"),
        ("$", "dollarsub"),
        ("uniqueSorted", "uniquesorted"),
    ];
    for (name, slug) in expected {
        assert_eq!(anchor_slug(name), slug, "{}", name);
    }
}

#[test]
fn test_alphabetical_symbolic_first() {
    let registry =
        Registry::from_yaml("operators:\n  b: {}\n  \"<\": {}\n  A: {}\n  \"$\": {}\n  a: {}\n").unwrap();
    let order: Vec<&str> = alphabetical(&registry)
        .into_iter()
        .map(|op| op.name.as_str())
        .collect();
    assert_eq!(order, vec!["$", "<", "A", "a", "b"]);
}
