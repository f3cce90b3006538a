//! Split a source file into named sections using inline marker comments.
//!
//! A marker is any line comment whose text reads `section: <title>`, e.g.
//! `# --- section: formatting ---` or `// section: handlers`. Each marker
//! opens a section that runs until the line before the next marker. Lines
//! above the first marker belong to no section.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::ENTIRE_FILE_SECTION;
use crate::models::SourceSection;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:#|//|--|/\*|<!--|;)[\s#/*=\-]*section\s*:(.*)$").unwrap()
});

/// Punctuation stripped from both ends of a marker title.
const TITLE_TRIM: &[char] = &['-', '=', '*', '#', '/', '<', '>', '!'];

/// Title carried by a marker line, if the line is a marker.
pub fn marker_title(line: &str) -> Option<String> {
    let caps = MARKER_RE.captures(line)?;
    let title = caps[1].trim_matches(|c: char| c.is_whitespace() || TITLE_TRIM.contains(&c));
    Some(if title.is_empty() { "untitled".to_string() } else { title.to_string() })
}

/// Ordered, non-overlapping sections of `text`.
///
/// Empty text has no sections; text without markers is one
/// `entire-file` section.
pub fn sectionize(text: &str) -> Vec<SourceSection> {
    let line_count = text.lines().count() as u32;
    if line_count == 0 {
        return Vec::new();
    }

    let markers: Vec<(u32, String)> = text
        .lines()
        .enumerate()
        .filter_map(|(i, line)| marker_title(line).map(|t| (i as u32 + 1, t)))
        .collect();

    if markers.is_empty() {
        return vec![SourceSection {
            title: ENTIRE_FILE_SECTION.to_string(),
            start_line: 1,
            end_line: line_count,
        }];
    }

    markers
        .iter()
        .enumerate()
        .map(|(i, (start, title))| SourceSection {
            title: title.clone(),
            start_line: *start,
            end_line: markers.get(i + 1).map_or(line_count, |(next, _)| next - 1),
        })
        .collect()
}
