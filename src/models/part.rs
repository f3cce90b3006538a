//! Review parts: self-contained pieces of feedback for one file.

use serde::{Deserialize, Serialize};

use crate::constants::SUGGESTION_FENCE;

/// Where a part came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PartOrigin {
    /// Split out of the generated review document.
    Document,
    /// Stand-in for a file the document did not mention.
    Placeholder,
    /// Produced by a built-in rule check.
    Rule { rule_id: String },
}

/// One piece of review feedback destined for one posted comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPart {
    pub file_path: String,
    pub raw_text: String,
    /// Whether `raw_text` carries a replacement block.
    pub has_concrete_replacement: bool,
    /// Exact after-side line this part is about, when known.
    pub target_line: Option<u32>,
    pub origin: PartOrigin,
}

impl ReviewPart {
    /// A part split out of the review document.
    pub fn from_document(file_path: impl Into<String>, raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        Self {
            file_path: file_path.into(),
            has_concrete_replacement: count_replacement_blocks(&raw_text) > 0,
            raw_text,
            target_line: None,
            origin: PartOrigin::Document,
        }
    }

    /// The placeholder for a file without any document block.
    pub fn placeholder(file_path: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            origin: PartOrigin::Placeholder,
            ..Self::from_document(file_path, raw_text)
        }
    }

    /// A rule finding pinned to an exact line.
    pub fn from_rule(
        file_path: impl Into<String>,
        rule_id: impl Into<String>,
        line: u32,
        raw_text: impl Into<String>,
    ) -> Self {
        let raw_text = raw_text.into();
        Self {
            file_path: file_path.into(),
            has_concrete_replacement: count_replacement_blocks(&raw_text) > 0,
            raw_text,
            target_line: Some(line),
            origin: PartOrigin::Rule { rule_id: rule_id.into() },
        }
    }

    /// Copy of this part with a new body, re-deriving the replacement flag.
    pub fn with_text(&self, raw_text: String) -> Self {
        Self {
            has_concrete_replacement: count_replacement_blocks(&raw_text) > 0,
            raw_text,
            ..self.clone()
        }
    }
}

/// Count fenced replacement blocks (lines opening with the suggestion fence).
pub fn count_replacement_blocks(text: &str) -> usize {
    text.lines()
        .filter(|l| is_suggestion_fence(l.trim_start()))
        .count()
}

fn is_suggestion_fence(line: &str) -> bool {
    line.strip_prefix(SUGGESTION_FENCE)
        .is_some_and(|rest| rest.trim().is_empty())
}

/// Lines of the first replacement block in `text`, if any.
pub fn replacement_block_lines(text: &str) -> Option<Vec<&str>> {
    let mut lines = text.lines();
    lines.find(|l| is_suggestion_fence(l.trim_start()))?;
    Some(
        lines
            .take_while(|l| !l.trim_start().starts_with("```"))
            .collect(),
    )
}
