//! Custom MiniJinja filters for documentation templates

use crate::util;
use minijinja::Environment;

/// Register all custom filters with the environment
pub fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("anchor", anchor);
    env.add_filter("escape_md", escape_md);
    env.add_filter("title_words", title_words);
}

fn anchor(value: &str) -> String {
    util::anchor_slug(value)
}

fn escape_md(value: &str) -> String {
    util::escape_markdown(value)
}

fn title_words(value: &str) -> String {
    util::title_case(value)
}
