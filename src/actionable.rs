//! Guarantee every part carries a machine-applicable replacement block.

use crate::constants::{FENCE_CLOSE, SUGGESTION_FENCE};
use crate::models::ReviewPart;

/// Line-comment leader for the language implied by `path`.
pub fn comment_prefix_for(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "rs" | "c" | "h" | "cc" | "cpp" | "hpp" | "cs" | "java" | "kt" | "kts" | "swift"
        | "dart" | "js" | "jsx" | "mjs" | "ts" | "tsx" | "go" | "scala" | "php" => "//",
        "sql" | "lua" | "hs" | "elm" => "--",
        _ => "#",
    }
}

/// Return `part` unchanged if it already has a replacement block, otherwise
/// a copy with one synthesized from `source_line`.
///
/// The synthesized replacement is the current line tagged with
/// `bot_marker`, or a bare marker comment when the line is blank or
/// unknown.
pub fn ensure_actionable(part: &ReviewPart, source_line: Option<&str>, bot_marker: &str) -> ReviewPart {
    if part.has_concrete_replacement {
        return part.clone();
    }

    let prefix = comment_prefix_for(&part.file_path);
    let replacement = match source_line.filter(|l| !l.trim().is_empty()) {
        Some(line) if line.contains(bot_marker) => line.to_string(),
        Some(line) => format!("{line}  {prefix} {bot_marker}"),
        None => format!("{prefix} {bot_marker}"),
    };

    let text = part.raw_text.trim_end();
    let separator = if text.is_empty() { "" } else { "\n\n" };
    part.with_text(format!("{text}{separator}{SUGGESTION_FENCE}\n{replacement}\n{FENCE_CLOSE}"))
}

/// 1-based line `n` of `content`, if it exists.
pub fn source_line(content: Option<&str>, n: u32) -> Option<&str> {
    content?.lines().nth((n as usize).checked_sub(1)?)
}
