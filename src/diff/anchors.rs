//! After-side anchor candidates for one file's diff.
//!
//! A review API only accepts inline comments on lines visible on the right
//! side of the diff. [`AnchorIndex`] collects those lines from parsed hunks,
//! added lines first, and answers the lookups the anchor mapper needs.

use indexmap::IndexSet;

use super::parser::parse_patch;
use crate::models::diff::{DiffLineType, Hunk};
use crate::models::{AnchorCandidate, AnchorConfidence};

/// Line used when a diff offers no after-side position at all.
pub const FALLBACK_ANCHOR_LINE: u32 = 1;

/// Ordered, never-empty list of anchor candidates for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorIndex {
    candidates: Vec<AnchorCandidate>,
}

/// Build the anchor index for a single file's patch text.
pub fn candidate_anchors(patch: &str) -> AnchorIndex {
    AnchorIndex::from_hunks(&parse_patch(patch))
}

impl AnchorIndex {
    /// Collect added lines, then context lines, each in diff order.
    ///
    /// A line number seen twice (overlapping hunks) keeps its first
    /// classification.
    pub fn from_hunks(hunks: &[Hunk]) -> Self {
        let mut seen = IndexSet::new();
        let mut candidates = Vec::new();

        for (line_type, confidence) in [
            (DiffLineType::Added, AnchorConfidence::Added),
            (DiffLineType::Context, AnchorConfidence::Context),
        ] {
            for line in hunks.iter().flat_map(|h| h.after_lines(line_type)) {
                if line > 0 && seen.insert(line) {
                    candidates.push(AnchorCandidate { line, confidence });
                }
            }
        }

        if candidates.is_empty() {
            candidates.push(AnchorCandidate::context(FALLBACK_ANCHOR_LINE));
        }
        Self { candidates }
    }

    pub fn candidates(&self) -> &[AnchorCandidate] {
        &self.candidates
    }

    /// Candidate line numbers in index order.
    pub fn lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.candidates.iter().map(|c| c.line)
    }

    pub fn contains(&self, line: u32) -> bool {
        self.candidates.iter().any(|c| c.line == line)
    }

    /// The `i`-th candidate, reusing the last one once the list runs out.
    pub fn positional(&self, i: usize) -> u32 {
        let idx = i.min(self.candidates.len() - 1);
        self.candidates[idx].line
    }

    /// Candidate closest to `target`; ties go to the smaller line number.
    pub fn nearest(&self, target: u32) -> u32 {
        self.lines()
            .min_by_key(|&line| (line.abs_diff(target), line))
            .unwrap_or(FALLBACK_ANCHOR_LINE)
    }
}
