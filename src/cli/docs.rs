//! Reference and index generation command

use super::util::{display_name, write_output};
use super::Session;
use opcheck::{Assembler, Result};
use std::path::PathBuf;

pub fn cmd_docs(session: &Session, template_dir: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let registry = session.load_registry()?;
    let docs = &session.config.docs;
    let template_dir = template_dir.or_else(|| docs.template_dir.clone());

    let mut assembler = Assembler::new(&registry)?
        .with_title(&docs.title)
        .with_reference_link(&docs.reference_link)
        .with_source_name(display_name(&session.config.registry))
        .with_template_dir(template_dir.as_deref())?;
    if let Some(categories) = &docs.categories {
        assembler = assembler.with_categories(categories.clone());
    }

    let rendered = assembler.assemble()?;
    for warning in &rendered.warnings {
        eprintln!("Warning: {}", warning);
    }

    let outputs = [
        (&docs.reference, &rendered.reference),
        (&docs.alpha_index, &rendered.alpha_index),
        (&docs.task_index, &rendered.task_index),
    ];

    if dry_run {
        for (path, content) in &outputs {
            eprintln!("Would write {} ({} bytes)", path.display(), content.len());
        }
    } else {
        for (path, content) in &outputs {
            write_output(path, content)?;
        }
    }

    if session.json {
        let summary = serde_json::json!({
            "operators": registry.len(),
            "registry_hash": registry.fingerprint(),
            "written": !dry_run,
            "outputs": outputs.iter().map(|(path, _)| path.display().to_string()).collect::<Vec<_>>(),
            "warnings": rendered.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "✓ Documented {} operators in {} files",
            registry.len(),
            outputs.len()
        );
    }
    Ok(())
}
