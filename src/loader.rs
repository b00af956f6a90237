//! Reads configuration files into the engine's value model.

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::error_utils::create_named_source;
use crate::value::{Value, ValueError};

#[derive(Error, Debug, Diagnostic)]
#[error("Error parsing YAML file: {message}")]
#[diagnostic(code(infraval::load::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: Option<SourceSpan>,
    pub message: String,
}

#[derive(Error, Debug, Diagnostic)]
pub enum LoadError {
    #[error("File not found: {}", path.display())]
    #[diagnostic(code(infraval::load::not_found))]
    NotFound { path: PathBuf },

    #[error("Failed to read {}", path.display())]
    #[diagnostic(code(infraval::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Unsupported YAML structure: {0}")]
    #[diagnostic(code(infraval::load::structure))]
    Structure(#[from] ValueError),
}

/// Load and parse a configuration file.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", content.len(), path.display());

    let value = parse_document(path, content)?;
    info!("Loaded configuration from {}", path.display());
    Ok(value)
}

/// Parse YAML source; `path` is only used to label diagnostics.
pub fn parse_document(path: &Path, content: String) -> Result<Value, LoadError> {
    let raw: serde_yaml::Value = match serde_yaml::from_str(&content) {
        Ok(raw) => raw,
        Err(err) => {
            let span = err
                .location()
                .map(|location| SourceSpan::new(location.index().into(), 0));
            return Err(YamlSyntaxError {
                src: create_named_source(path, content),
                span,
                message: err.to_string(),
            }
            .into());
        }
    };

    Ok(Value::try_from(raw)?)
}
