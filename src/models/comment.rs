//! Anchored comments and the final emission plan.

use serde::{Deserialize, Serialize};

use super::part::PartOrigin;
use crate::constants::{MAX_BODY_CHARS, MAX_COMMENTS_PER_BATCH};

/// A part resolved to a concrete anchor, ready to post inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedComment {
    pub file_path: String,
    pub body: String,
    /// After-side line the comment attaches to (1-based).
    pub anchor_line: u32,
    /// First line of a multi-line range; never greater than `anchor_line`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_start_line: Option<u32>,
    pub origin: PartOrigin,
}

/// A single non-inline note bundling parts that could not be posted inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackDigest {
    pub body: String,
}

/// Size and count caps applied to everything posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_body_chars: usize,
    pub max_comments: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_body_chars: MAX_BODY_CHARS,
            max_comments: MAX_COMMENTS_PER_BATCH,
        }
    }
}

impl Limits {
    /// Never exceed the sink API's hard caps.
    pub fn clamped(self) -> Self {
        Self {
            max_body_chars: self.max_body_chars.clamp(1, MAX_BODY_CHARS),
            max_comments: self.max_comments.min(MAX_COMMENTS_PER_BATCH),
        }
    }
}

/// Everything the publishing boundary needs for one pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionPlan {
    /// Body of the summary note.
    pub summary: String,
    /// Inline comments, file-then-part ordered, within the count cap.
    pub comments: Vec<MappedComment>,
    /// Comments beyond the count cap; reported through the failure note.
    pub overflow: Vec<MappedComment>,
    /// Digest of every mapped part, posted only when nothing lands inline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackDigest>,
    /// Number of files that took part in planning.
    pub relevant_files: usize,
    /// Caps the plan was built with; notes composed at post time reuse them.
    #[serde(skip)]
    pub limits: Limits,
}

impl EmissionPlan {
    /// Plan for a change set with nothing to review.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `false` signals the "no relevant files" condition to the caller.
    pub fn has_relevant_files(&self) -> bool {
        self.relevant_files > 0
    }

    /// Total comments mapped, including those cut by the count cap.
    pub fn mapped_count(&self) -> usize {
        self.comments.len() + self.overflow.len()
    }
}
