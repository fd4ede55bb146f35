//! Error types for opcheck

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// opcheck errors
///
/// Only fatal conditions live here. A failing documentation example is a
/// [`crate::conformance::ConformanceOutcome`], not an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Registry load error: {0}")]
    Load(String),

    #[error("Operator probe failed: {0}")]
    Probe(String),

    #[error("Interpreter unavailable: {0}")]
    Interpreter(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("README error: {0}")]
    Readme(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
