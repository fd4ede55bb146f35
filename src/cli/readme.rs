//! README generation command

use super::util::{display_name, write_output};
use super::Session;
use opcheck::{ReadmeGenerator, ReadmeSource, Result};
use std::path::PathBuf;

pub fn cmd_readme(
    session: &Session,
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    template_dir: Option<PathBuf>,
) -> Result<()> {
    let config = &session.config.readme;
    let source_path = source.unwrap_or_else(|| config.source.clone());
    let output_path = output.unwrap_or_else(|| config.output.clone());
    let template_dir = template_dir.or_else(|| session.config.docs.template_dir.clone());

    let readme = ReadmeSource::load(&source_path)?;

    let interpreter = session.interpreter();
    let live = match interpreter.ensure_available() {
        Ok(()) => Some(interpreter),
        Err(e) => {
            eprintln!("Warning: {}; debug output will not be included", e);
            None
        }
    };

    let generator = ReadmeGenerator::new(live)?
        .with_source_name(display_name(&source_path))
        .with_template_dir(template_dir.as_deref())?
        .with_verbose(session.verbose);

    let debug_examples = readme
        .examples
        .iter()
        .filter(|ex| generator.has_debug_flags(ex))
        .count();
    if debug_examples > 0 && !session.json {
        eprintln!(
            "Found {} debug examples - capturing live debug output...",
            debug_examples
        );
    }

    let content = generator.render(&readme)?;
    write_output(&output_path, &content)?;

    if session.json {
        let summary = serde_json::json!({
            "source": source_path.display().to_string(),
            "output": output_path.display().to_string(),
            "examples": readme.examples.len(),
            "debug_examples": debug_examples,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "✓ Generated {} from {} ({} examples)",
            output_path.display(),
            source_path.display(),
            readme.examples.len()
        );
    }
    Ok(())
}
