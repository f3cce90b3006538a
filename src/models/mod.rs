//! Shared types used across all modules.
//!
//! This module defines the core data structures for diffs, anchors,
//! sections, review parts, and the emission plan. Pipeline stages import
//! from here rather than reaching into each other's internals.

pub mod change;
pub mod comment;
pub mod diff;
pub mod part;
pub mod section;

use std::path::PathBuf;

pub use change::ChangedFile;
pub use comment::{EmissionPlan, FallbackDigest, Limits, MappedComment};
pub use diff::{AnchorCandidate, AnchorConfidence, FileDiff};
pub use part::{PartOrigin, ReviewPart};
pub use section::SourceSection;

/// Where the offline planner reads the change set from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    /// A pre-computed unified diff on disk.
    DiffFile(PathBuf),
    /// `git diff <ref>` in the working directory.
    GitBase(String),
}

/// Where the generated review document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Stdin,
}

impl DocumentSource {
    /// Interpret a CLI argument, with `-` meaning stdin.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            DocumentSource::Stdin
        } else {
            DocumentSource::File(PathBuf::from(arg))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_means_stdin() {
        assert_eq!(DocumentSource::from_arg("-"), DocumentSource::Stdin);
        assert_eq!(
            DocumentSource::from_arg("review.md"),
            DocumentSource::File(PathBuf::from("review.md"))
        );
    }
}
