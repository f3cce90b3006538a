//! Map review parts onto anchor lines.
//!
//! Resolution order per part:
//! 1. a rule part whose line is a candidate anchors there exactly;
//! 2. a rule part outside the diff anchors at the nearest candidate;
//! 3. every other part takes the candidate at its own index in the
//!    file's part list, reusing the last one once the list is exhausted.
//!
//! Parts are then made actionable against the source line at their anchor.

use serde::Serialize;

use crate::actionable::{ensure_actionable, source_line};
use crate::diff::AnchorIndex;
use crate::models::part::replacement_block_lines;
use crate::models::{MappedComment, ReviewPart};

/// How an anchor line was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorMethod {
    Exact,
    Nearest,
    Positional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAnchor {
    pub line: u32,
    pub method: AnchorMethod,
}

/// Anchor for one part. `position` is the part's index in the file's
/// merged part list.
pub fn resolve_anchor(part: &ReviewPart, position: usize, index: &AnchorIndex) -> ResolvedAnchor {
    match part.target_line {
        Some(line) if index.contains(line) => ResolvedAnchor { line, method: AnchorMethod::Exact },
        Some(line) => ResolvedAnchor {
            line: index.nearest(line),
            method: AnchorMethod::Nearest,
        },
        None => ResolvedAnchor {
            line: index.positional(position),
            method: AnchorMethod::Positional,
        },
    }
}

/// First line of a multi-line range ending at `anchor`.
///
/// Only returned when every line of the range is itself a candidate.
pub fn range_start(body: &str, anchor: u32, index: &AnchorIndex) -> Option<u32> {
    let span = replacement_block_lines(body)?.len() as u32;
    if span < 2 || anchor < span {
        return None;
    }
    let start = anchor - (span - 1);
    (start..anchor).all(|l| index.contains(l)).then_some(start)
}

/// Map one file's parts, in order, to postable comments.
pub fn map_file(
    parts: &[ReviewPart],
    index: &AnchorIndex,
    content: Option<&str>,
    bot_marker: &str,
) -> Vec<MappedComment> {
    parts
        .iter()
        .enumerate()
        .map(|(position, part)| {
            let anchor = resolve_anchor(part, position, index);
            tracing::debug!(
                path = %part.file_path,
                line = anchor.line,
                method = ?anchor.method,
                "resolved anchor"
            );

            let part = ensure_actionable(part, source_line(content, anchor.line), bot_marker);
            MappedComment {
                range_start_line: range_start(&part.raw_text, anchor.line, index),
                file_path: part.file_path,
                body: part.raw_text,
                anchor_line: anchor.line,
                origin: part.origin,
            }
        })
        .collect()
}
