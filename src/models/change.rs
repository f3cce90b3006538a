//! A changed file as handed over by the fetching boundary.

use serde::{Deserialize, Serialize};

use super::diff::{FileDiff, Hunk};
use crate::diff::parser::parse_patch;

/// One changed file: its diff hunks and, when available, its after content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub path: String,
    pub hunks: Vec<Hunk>,
    /// Full after-side text; `None` when it could not be retrieved.
    pub content: Option<String>,
}

impl ChangedFile {
    /// Build from a single-file patch (GitHub `patch` field style).
    pub fn from_patch(path: impl Into<String>, patch: &str, content: Option<String>) -> Self {
        Self {
            path: path.into(),
            hunks: parse_patch(patch),
            content,
        }
    }

    /// Build from one entry of a parsed multi-file diff.
    pub fn from_file_diff(diff: FileDiff, content: Option<String>) -> Self {
        Self {
            path: diff.path().to_string(),
            hunks: diff.hunks,
            content,
        }
    }

    /// Whether the path ends in one of `extensions` (case-insensitive).
    ///
    /// An empty extension list accepts every path.
    pub fn matches_extensions(path: &str, extensions: &[String]) -> bool {
        if extensions.is_empty() {
            return true;
        }
        let lower = path.to_lowercase();
        extensions.iter().any(|ext| lower.ends_with(&ext.to_lowercase()))
    }
}
