//! CLI utility helpers

use super::Session;
use opcheck::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write content to a file, creating parent directories
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(Error::Io)?;
    }
    fs::write(path, content).map_err(Error::Io)?;
    eprintln!("Written to: {}", path.display());
    Ok(())
}

/// Print `value` as JSON with `--json`, otherwise the text form
pub fn emit<T: Serialize>(session: &Session, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if session.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

/// File name for report footers
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
