//! Read diffs and review documents from disk or stdin.

use std::path::Path;

use super::DiffError;
use crate::models::DocumentSource;

/// Read a UTF-8 text file, failing clearly when it does not exist.
pub async fn read_text_file(path: &Path) -> Result<String, DiffError> {
    if !path.exists() {
        return Err(DiffError::PathNotFound(path.display().to_string()));
    }

    tokio::fs::read_to_string(path)
        .await
        .map_err(DiffError::FileReadError)
}

/// Read all of stdin.
pub async fn read_stdin() -> Result<String, DiffError> {
    use tokio::io::AsyncReadExt;
    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .map_err(DiffError::FileReadError)?;
    Ok(buf)
}

/// Read the review document from a file or stdin.
pub async fn read_document(source: &DocumentSource) -> Result<String, DiffError> {
    match source {
        DocumentSource::File(path) => read_text_file(path).await,
        DocumentSource::Stdin => read_stdin().await,
    }
}
