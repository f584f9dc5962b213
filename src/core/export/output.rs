//! Filesystem writes of the export
//!
//! Every failure here becomes [`XtractorError::Output`] naming the path. The
//! run stops on the first one; files already written stay on disk.

use crate::domain::{Result, XtractorError};
use std::path::Path;

/// XML declaration that starts every document except the redirect rules
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Creates `dir` and its parents; an existing directory is fine
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| XtractorError::output(dir, e))
}

/// Writes `contents` to `path`, replacing any existing file
pub async fn write_file(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents.as_bytes())
        .await
        .map_err(|e| XtractorError::output(path, e))
}

/// Removes `dir` recursively when it exists
pub async fn remove_tree(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {
            tracing::info!(path = %dir.display(), "Removed previous output");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(XtractorError::output(dir, e)),
    }
}
