//! Shared utility functions
//!
//! String helpers used by the reference, index, and README renderers.

use std::collections::BTreeMap;

/// Ordered substitutions applied to a lower-cased operator name
///
/// Each pair rewrites the output of the previous one, so later entries also
/// see text produced by earlier ones (`$` → `dollar-` → `dollarsub`). Existing
/// links depend on this exact behavior.
pub const ANCHOR_SUBSTITUTIONS: [(&str, &str); 12] = [
    ("$", "dollar-"),
    ("!", "not-"),
    ("=", "equal"),
    ("<", "less"),
    (">", "greater"),
    ("&", "and"),
    ("|", "or"),
    ("%", "mod"),
    ("*", "mul"),
    ("+", "add"),
    ("-", "sub"),
    ("/", "div"),
];

/// URL fragment for an operator's reference section
///
/// # Examples
/// ```
/// use opcheck::util::anchor_slug;
/// assert_eq!(anchor_slug("+"), "add");
/// assert_eq!(anchor_slug(">="), "greaterequal");
/// assert_eq!(anchor_slug("strConcat"), "strconcat");
/// ```
pub fn anchor_slug(name: &str) -> String {
    ANCHOR_SUBSTITUTIONS
        .iter()
        .fold(name.to_lowercase(), |acc, (from, to)| acc.replace(from, to))
}

/// Slugs shared by more than one name, with the names sharing them
pub fn anchor_collisions<'a, I>(names: I) -> Vec<(String, Vec<String>)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut by_slug: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in names {
        by_slug
            .entry(anchor_slug(name))
            .or_default()
            .push(name.to_string());
    }
    by_slug
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .collect()
}

/// Escape characters that break inline code spans and tables
///
/// # Examples
/// ```
/// use opcheck::util::escape_markdown;
/// assert_eq!(escape_markdown("a|b"), "a\\|b");
/// ```
pub fn escape_markdown(text: &str) -> String {
    text.replace('`', "\\`").replace('|', "\\|")
}

/// `snake_case` or `kebab-case` words to Title Case
///
/// Example names and category keys go through the same rule: both `_` and
/// `-` separate words and the rest of each word is lower-cased, so
/// `traced-run` gives `Traced Run` and `array_ops` gives `Array Ops`.
///
/// # Examples
/// ```
/// use opcheck::util::title_case;
/// assert_eq!(title_case("basic_multiplication"), "Basic Multiplication");
/// assert_eq!(title_case("array-ops"), "Array Ops");
/// assert_eq!(title_case("traced-run"), "Traced Run");
/// assert_eq!(title_case("array_ops"), "Array Ops");
/// ```
pub fn title_case(s: &str) -> String {
    s.split(|c: char| c == '_' || c == '-' || c == ' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Keep the first `max` lines, marking the cut
pub fn truncate_lines(text: &str, max: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= max {
        return text.to_string();
    }
    let mut kept = lines[..max].to_vec();
    kept.push("... (truncated for brevity)");
    kept.join("\n")
}
