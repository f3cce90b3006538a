//! Split a generated review document into per-file parts.
//!
//! The document is markdown. A file block opens at a heading of the file
//! level (default `##`) whose text names a changed file and runs until the
//! next heading of that level naming a path. Headings of that level that
//! name no path (`## Notes`) stay part of the block's text. Inside a block, headings of the part level
//! (default `###`) start new parts; text before the first one is an
//! implicit leading part. Headings inside fenced code blocks are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::NO_SUGGESTIONS_TEXT;
use crate::models::ReviewPart;

/// Heading levels that structure a review document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentLayout {
    pub file_heading_level: usize,
    pub part_heading_level: usize,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            file_heading_level: 2,
            part_heading_level: 3,
        }
    }
}

/// Per-file raw parts, keyed by the changed file's own path.
pub type DocumentParts = IndexMap<String, Vec<String>>;

/// Raw parts for every file in `files`, with a placeholder for files the
/// document does not cover.
pub fn parse_review_document(doc: &str, files: &[String], layout: &DocumentLayout) -> DocumentParts {
    let mut found = split_document(doc, files, layout);
    files
        .iter()
        .map(|path| {
            let parts = found
                .shift_remove(path)
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| vec![placeholder_text(path)]);
            (path.clone(), parts)
        })
        .collect()
}

/// [`parse_review_document`] as typed parts, keeping track of which ones
/// are placeholders.
pub fn review_parts(doc: &str, files: &[String], layout: &DocumentLayout) -> IndexMap<String, Vec<ReviewPart>> {
    parse_review_document(doc, files, layout)
        .into_iter()
        .map(|(path, raw)| {
            let parts = if is_placeholder(&path, &raw) {
                vec![ReviewPart::placeholder(&path, placeholder_text(&path))]
            } else {
                raw.into_iter().map(|t| ReviewPart::from_document(&path, t)).collect()
            };
            (path, parts)
        })
        .collect()
}

fn is_placeholder(path: &str, raw: &[String]) -> bool {
    matches!(raw, [only] if *only == placeholder_text(path))
}

/// Body of the part emitted for a file without document feedback.
pub fn placeholder_text(path: &str) -> String {
    format!("**{path}**\n\n{NO_SUGGESTIONS_TEXT}")
}

/// Blocks the document actually contains, resolved to changed-file paths.
///
/// Repeated headings for one file append to that file's parts in document
/// order. Blocks naming a file outside `files` are dropped.
pub fn split_document(doc: &str, files: &[String], layout: &DocumentLayout) -> DocumentParts {
    let mut result = DocumentParts::new();
    for (target, body) in file_blocks(doc, files, layout.file_heading_level) {
        let FileHeading::Changed(path) = target else {
            tracing::debug!("document block names no changed file");
            continue;
        };
        result
            .entry(path.to_string())
            .or_default()
            .extend(split_parts(&body, layout.part_heading_level));
    }
    result
}

/// What a heading at the file level refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileHeading<'a> {
    /// One of the changed files.
    Changed(&'a str),
    /// A path outside the change set; its block is dropped.
    Unknown,
}

/// Classify a file-level heading. `None` means it names no path at all
/// (e.g. `## Notes`) and belongs to the surrounding block's text.
fn classify_heading<'a>(text: &str, files: &'a [String]) -> Option<FileHeading<'a>> {
    if let Some(path) = resolve_path(text, files) {
        return Some(FileHeading::Changed(path));
    }
    looks_like_path(trim_decoration(text)).then_some(FileHeading::Unknown)
}

fn trim_decoration(heading: &str) -> &str {
    heading.trim_matches(|c: char| c == '`' || c == '*' || c.is_whitespace())
}

/// A single token with an extension or a directory separator.
fn looks_like_path(name: &str) -> bool {
    !name.is_empty() && !name.contains(char::is_whitespace) && (name.contains('.') || name.contains('/'))
}

/// Exact path match first, then a case-insensitive pass.
fn resolve_path<'a>(heading: &str, files: &'a [String]) -> Option<&'a str> {
    let name = trim_decoration(heading);
    files
        .iter()
        .find(|f| f.as_str() == name)
        .or_else(|| files.iter().find(|f| f.eq_ignore_ascii_case(name)))
        .map(String::as_str)
}

/// Level of an ATX heading line, with its text.
fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t') {
        Some((level, rest.trim()))
    } else {
        None
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Iterate document lines, tagging each with whether it sits in a fence.
fn fenced_lines(text: &str) -> impl Iterator<Item = (&str, bool)> {
    let mut in_fence = false;
    text.lines().map(move |line| {
        if is_fence(line) {
            in_fence = !in_fence;
            (line, true)
        } else {
            (line, in_fence)
        }
    })
}

/// `(target, body)` for each heading of `level` that names a file path;
/// text before the first one is discarded.
fn file_blocks<'a>(doc: &str, files: &'a [String], level: usize) -> Vec<(FileHeading<'a>, String)> {
    let mut blocks: Vec<(FileHeading<'a>, String)> = Vec::new();
    for (line, fenced) in fenced_lines(doc) {
        let target = match heading(line) {
            Some((l, text)) if !fenced && l == level => classify_heading(text, files),
            _ => None,
        };
        match target {
            Some(target) => blocks.push((target, String::new())),
            None => {
                if let Some((_, body)) = blocks.last_mut() {
                    body.push_str(line);
                    body.push('\n');
                }
            }
        }
    }
    blocks
}

/// Split a file block into trimmed, non-empty parts.
fn split_parts(block: &str, level: usize) -> Vec<String> {
    let mut parts = vec![String::new()];
    for (line, fenced) in fenced_lines(block) {
        if !fenced && matches!(heading(line), Some((l, _)) if l == level) {
            parts.push(String::new());
        }
        if let Some(current) = parts.last_mut() {
            current.push_str(line);
            current.push('\n');
        }
    }
    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Serialize parts back into a document the parser accepts.
pub fn render_document(parts: &DocumentParts, layout: &DocumentLayout) -> String {
    let marker = "#".repeat(layout.file_heading_level);
    parts
        .iter()
        .map(|(path, parts)| format!("{marker} {path}\n\n{}\n", parts.join("\n\n")))
        .collect::<Vec<_>>()
        .join("\n")
}
