//! Named line ranges inside a source file.

use serde::{Deserialize, Serialize};

/// A named, contiguous, inclusive line range (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSection {
    pub title: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl SourceSection {
    /// Number of lines covered.
    pub fn line_count(&self) -> usize {
        (self.end_line - self.start_line + 1) as usize
    }
}
