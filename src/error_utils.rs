//! Shared error utilities

use miette::NamedSource;
use std::path::Path;

/// Format a file path for error display
///
/// Paths under the current directory are shown relative to it.
pub fn format_error_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok())
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Create a NamedSource with proper formatting for error display
pub fn create_named_source(path: &Path, content: String) -> NamedSource<String> {
    NamedSource::new(format_error_path(path), content).with_language("yaml")
}
