//! Diff-related types: file diffs, hunks, diff lines, and anchor candidates.

use serde::{Deserialize, Serialize};

/// The type of a line in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffLineType {
    /// Line exists only on the after side.
    Added,
    /// Line exists only on the origin side.
    Removed,
    /// Line is present on both sides.
    Context,
}

/// A single line in a diff hunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub line_type: DiffLineType,
    /// The content of the line (without the leading +/-/space).
    pub content: String,
    /// Line number on the origin side (None for added lines).
    pub old_line_no: Option<u32>,
    /// Line number on the after side (None for removed lines).
    pub new_line_no: Option<u32>,
}

/// A contiguous hunk within a file diff.
///
/// The after-side counter only advances on added and context lines, so
/// `new_line_no` is `Some` exactly for those two line types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Starting line on the origin side.
    pub old_start: u32,
    /// Number of lines on the origin side.
    pub old_count: u32,
    /// Starting line on the after side.
    pub new_start: u32,
    /// Number of lines on the after side.
    pub new_count: u32,
    /// Optional hunk header text (e.g., function name).
    pub header: Option<String>,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// After-side line numbers of the given type, in diff order.
    pub fn after_lines(&self, line_type: DiffLineType) -> impl Iterator<Item = u32> + '_ {
        self.lines
            .iter()
            .filter(move |l| l.line_type == line_type)
            .filter_map(|l| l.new_line_no)
    }
}

/// A diff for a single file, as found in multi-file `git diff` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDiff {
    /// Path of the old file (may be `/dev/null` for new files).
    pub old_path: String,
    /// Path of the new file (may be `/dev/null` for deleted files).
    pub new_path: String,
    pub is_new: bool,
    pub is_deleted: bool,
    pub is_rename: bool,
    pub is_binary: bool,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Returns the most relevant file path (new_path for non-deletes, old_path for deletes).
    pub fn path(&self) -> &str {
        if self.is_deleted {
            &self.old_path
        } else {
            &self.new_path
        }
    }

    /// Whether the file has an after side that comments can attach to.
    pub fn is_reviewable(&self) -> bool {
        !self.is_deleted && !self.is_binary
    }
}

/// How safe an anchor line is for the sink API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorConfidence {
    /// The line was added by the change.
    Added,
    /// The line is unchanged context shown in the diff.
    Context,
}

/// An after-side line a comment may legally attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorCandidate {
    /// 1-based after-side line number.
    pub line: u32,
    pub confidence: AnchorConfidence,
}

impl AnchorCandidate {
    pub fn added(line: u32) -> Self {
        Self { line, confidence: AnchorConfidence::Added }
    }

    pub fn context(line: u32) -> Self {
        Self { line, confidence: AnchorConfidence::Context }
    }
}
