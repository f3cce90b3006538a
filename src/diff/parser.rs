//! Unified diff format parser.
//!
//! Two entry points share one hunk parser: [`parse_unified_diff`] for full
//! multi-file `git diff` output and [`parse_patch`] for the per-file patch
//! text that code-hosting APIs return.

use crate::models::diff::{DiffLine, DiffLineType, FileDiff, Hunk};

/// Parse a unified diff string into a list of file diffs.
pub fn parse_unified_diff(input: &str) -> Vec<FileDiff> {
    let mut files: Vec<FileDiff> = Vec::new();
    let mut lines = input.lines().peekable();

    while let Some(line) = lines.next() {
        // Look for "diff --git a/... b/..."
        if !line.starts_with("diff --git ") {
            continue;
        }

        let (old_path, new_path) = parse_diff_header(line);
        let mut is_new = false;
        let mut is_deleted = false;
        let mut is_rename = false;
        let mut is_binary = false;
        let mut hunks: Vec<Hunk> = Vec::new();

        // Parse extended headers until we hit a hunk or another diff
        while let Some(&next) = lines.peek() {
            if next.starts_with("diff --git ") {
                break;
            }
            if next.starts_with("new file mode") {
                is_new = true;
                lines.next();
            } else if next.starts_with("deleted file mode") {
                is_deleted = true;
                lines.next();
            } else if next.starts_with("rename from") || next.starts_with("rename to") {
                is_rename = true;
                lines.next();
            } else if next.starts_with("similarity index") || next.starts_with("dissimilarity index") {
                lines.next();
            } else if next.starts_with("index ") {
                lines.next();
            } else if next.contains("Binary files") {
                is_binary = true;
                lines.next();
            } else if next.starts_with("---") || next.starts_with("+++") {
                // File path lines before hunks
                lines.next();
            } else if next.starts_with("@@") {
                // Parse hunk
                if let Some(hunk) = parse_hunk(&mut lines) {
                    hunks.push(hunk);
                }
            } else {
                lines.next();
            }
        }

        files.push(FileDiff {
            old_path,
            new_path,
            is_new,
            is_deleted,
            is_rename,
            is_binary,
            hunks,
        });
    }

    files
}

/// Parse the "diff --git a/path b/path" header line.
fn parse_diff_header(line: &str) -> (String, String) {
    let rest = line.strip_prefix("diff --git ").unwrap_or(line);

    // Handle paths with spaces by finding the second prefix separator
    // Paths are prefixed with a/ and b/ (default), or c/w/i/o/ when
    // git's diff.mnemonicPrefix is enabled.
    if let Some(b_idx) = find_second_prefix(rest) {
        let a_part = &rest[..b_idx];
        let b_part = &rest[b_idx + 1..]; // skip the space

        let old_path = strip_diff_prefix(a_part).to_string();
        let new_path = strip_diff_prefix(b_part).to_string();
        (old_path, new_path)
    } else {
        // Fallback: split on space
        let parts: Vec<&str> = rest.splitn(2, ' ').collect();
        let old_path = strip_diff_prefix(parts.first().unwrap_or(&"")).to_string();
        let new_path = strip_diff_prefix(parts.get(1).unwrap_or(&"")).to_string();
        (old_path, new_path)
    }
}

/// Strip a single-character git diff prefix (`a/`, `b/`, `c/`, `w/`, `i/`, `o/`).
///
/// These prefixes appear in `diff --git` headers:
/// - `a/` and `b/` are the defaults.
/// - `c/` (commit), `w/` (working tree), `i/` (index), `o/` (object)
///   are used when `diff.mnemonicPrefix` is enabled.
fn strip_diff_prefix(path: &str) -> &str {
    if path.len() >= 2 {
        let bytes = path.as_bytes();
        if bytes[1] == b'/' && matches!(bytes[0], b'a' | b'b' | b'c' | b'w' | b'i' | b'o') {
            return &path[2..];
        }
    }
    path
}

/// Find the position of the second path prefix separator in a diff header.
///
/// Looks for ` X/` where X is any known single-letter prefix (`a`..`o`).
fn find_second_prefix(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    for i in 1..bytes.len().saturating_sub(1) {
        if bytes[i] == b' '
            && bytes.get(i + 2) == Some(&b'/')
            && matches!(bytes.get(i + 1), Some(b'a' | b'b' | b'c' | b'w' | b'i' | b'o'))
        {
            return Some(i);
        }
    }
    None
}

/// Parse the hunks of a single file's patch (no `diff --git` header).
///
/// This is the shape code-hosting APIs hand out per changed file. File
/// header lines are skipped; body lines appearing before any hunk header
/// form an implicit hunk whose counters start at line 1.
pub fn parse_patch(input: &str) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut lines = input.lines().peekable();

    while let Some(&next) = lines.peek() {
        if next.starts_with("@@") {
            match parse_hunk(&mut lines) {
                Some(hunk) => hunks.push(hunk),
                None => continue,
            }
        } else if hunks.is_empty() && !is_file_header(next) && is_body_line(next) {
            hunks.push(parse_hunk_body(&mut lines, 1, 1, None));
        } else {
            lines.next();
        }
    }

    hunks
}

/// Structural lines that precede the first hunk of a file.
fn is_file_header(line: &str) -> bool {
    line.starts_with("--- ")
        || line.starts_with("+++ ")
        || line.starts_with("diff ")
        || line.starts_with("index ")
        || line.starts_with("new file mode")
        || line.starts_with("deleted file mode")
}

fn is_body_line(line: &str) -> bool {
    line.starts_with('+') || line.starts_with('-') || line.starts_with(' ')
}

type LineIter<'a> = std::iter::Peekable<std::str::Lines<'a>>;

/// Parse a single hunk starting with its `@@` line.
///
/// Returns `None` (having consumed the header) when the header is malformed.
fn parse_hunk(lines: &mut LineIter<'_>) -> Option<Hunk> {
    let header_line = lines.next()?;
    let header = parse_hunk_header(header_line)?;
    let mut hunk = parse_hunk_body(lines, header.old_start, header.new_start, header.text);
    hunk.old_count = header.old_count;
    hunk.new_count = header.new_count;
    Some(hunk)
}

/// Consume body lines until the next structural line.
///
/// The after-side counter advances on added and context lines only and
/// saturates at `u32::MAX`.
fn parse_hunk_body(
    lines: &mut LineIter<'_>,
    old_start: u32,
    new_start: u32,
    header: Option<String>,
) -> Hunk {
    let mut hunk_lines: Vec<DiffLine> = Vec::new();
    let mut old_line = old_start;
    let mut new_line = new_start;

    while let Some(&next) = lines.peek() {
        if next.starts_with("diff --git ") || next.starts_with("@@") {
            break;
        }

        if let Some(content) = next.strip_prefix('+') {
            hunk_lines.push(DiffLine {
                line_type: DiffLineType::Added,
                content: content.to_string(),
                old_line_no: None,
                new_line_no: Some(new_line),
            });
            new_line = new_line.saturating_add(1);
        } else if let Some(content) = next.strip_prefix('-') {
            hunk_lines.push(DiffLine {
                line_type: DiffLineType::Removed,
                content: content.to_string(),
                old_line_no: Some(old_line),
                new_line_no: None,
            });
            old_line = old_line.saturating_add(1);
        } else if next.starts_with(' ') || next.is_empty() {
            hunk_lines.push(DiffLine {
                line_type: DiffLineType::Context,
                content: next.get(1..).unwrap_or_default().to_string(),
                old_line_no: Some(old_line),
                new_line_no: Some(new_line),
            });
            old_line = old_line.saturating_add(1);
            new_line = new_line.saturating_add(1);
        } else if !next.starts_with('\\') {
            // Unknown line format ends the hunk; "\ No newline" is skipped.
            break;
        }
        lines.next();
    }

    Hunk {
        old_start,
        old_count: old_line - old_start,
        new_start,
        new_count: new_line - new_start,
        header,
        lines: hunk_lines,
    }
}

/// Ranges and trailing text of an `@@` line.
struct HunkHeader {
    old_start: u32,
    old_count: u32,
    new_start: u32,
    new_count: u32,
    text: Option<String>,
}

/// Parse a `@@ -old_start,old_count +new_start,new_count @@ header` line.
///
/// The closing `@@` is optional; only the two ranges are required.
fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let line = line.strip_prefix("@@")?.trim_start();
    let (range_part, text) = match line.find("@@") {
        Some(end) => {
            let rest = line[end + 2..].trim();
            (&line[..end], (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (line, None),
    };

    let mut parts = range_part.split_whitespace();
    let (old_start, old_count) = parse_range(parts.next()?.strip_prefix('-')?)?;
    let (new_start, new_count) = parse_range(parts.next()?.strip_prefix('+')?)?;

    Some(HunkHeader {
        old_start,
        old_count,
        new_start,
        new_count,
        text,
    })
}

/// Parse "start,count" or "start" (count defaults to 1).
fn parse_range(s: &str) -> Option<(u32, u32)> {
    if let Some((start, count)) = s.split_once(',') {
        Some((start.parse().ok()?, count.parse().ok()?))
    } else {
        Some((s.parse().ok()?, 1))
    }
}
