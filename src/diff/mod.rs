//! Diff inputs: git CLI wrapper, unified diff parsing, and anchor candidates.

pub mod anchors;
pub mod file;
pub mod git;
pub mod parser;

use std::path::{Component, Path};

use indexmap::IndexSet;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{ChangedFile, DiffSource, FileDiff};

pub use anchors::{AnchorIndex, candidate_anchors};

/// Errors from reading change-set inputs.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("git command failed: {0}")]
    GitError(String),

    #[error("failed to read input: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("path not found: {0}")]
    PathNotFound(String),
}

/// Read and parse the multi-file diff named by `source`.
pub async fn load_diffs(source: &DiffSource, repo_root: &Path) -> Result<Vec<FileDiff>, DiffError> {
    let text = match source {
        DiffSource::DiffFile(path) => file::read_text_file(path).await?,
        DiffSource::GitBase(base_ref) => git::git_diff(repo_root, base_ref).await?,
    };
    Ok(parser::parse_unified_diff(&text))
}

/// Turn parsed diffs into changed files, loading after content from `root`.
///
/// Files that cannot be read keep `content = None` and still take part.
/// Paths that would resolve outside `root` are skipped.
pub async fn collect_local_changes(
    root: &Path,
    diffs: Vec<FileDiff>,
    extensions: &[String],
) -> Vec<ChangedFile> {
    let mut files = Vec::new();
    for diff in diffs {
        if !diff.is_reviewable() {
            debug!(path = diff.path(), "skipping deleted or binary file");
            continue;
        }
        if !is_contained(diff.path()) {
            warn!(path = diff.path(), "skipping path outside the repository");
            continue;
        }
        let content = match tokio::fs::read_to_string(root.join(diff.path())).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(path = diff.path(), error = %e, "after content unavailable");
                None
            }
        };
        files.push(ChangedFile::from_file_diff(diff, content));
    }
    select_files(files, extensions)
}

/// Whether a diff path stays below the directory it is joined onto.
fn is_contained(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Keep the first entry per path whose extension is accepted.
pub fn select_files(files: Vec<ChangedFile>, extensions: &[String]) -> Vec<ChangedFile> {
    let mut seen = IndexSet::new();
    files
        .into_iter()
        .filter(|f| ChangedFile::matches_extensions(&f.path, extensions))
        .filter(|f| seen.insert(f.path.clone()))
        .collect()
}
