//! Cap mapped comments into an emission plan and build the non-inline notes.

use indexmap::IndexMap;

use crate::constants::BOT_TITLE;
use crate::models::{EmissionPlan, FallbackDigest, MappedComment};

pub use crate::models::Limits;

/// Keep at most `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Build the emission plan from comments in file-then-part order.
pub fn assemble(mapped: Vec<MappedComment>, relevant_files: usize, limits: Limits) -> EmissionPlan {
    let limits = limits.clamped();
    if relevant_files == 0 {
        return EmissionPlan::empty();
    }

    let mut comments: Vec<MappedComment> = mapped
        .into_iter()
        .map(|c| MappedComment {
            body: truncate_chars(&c.body, limits.max_body_chars),
            ..c
        })
        .collect();
    let overflow = comments.split_off(limits.max_comments.min(comments.len()));
    if !overflow.is_empty() {
        tracing::info!(kept = comments.len(), dropped = overflow.len(), "comment count capped");
    }

    let all: Vec<&MappedComment> = comments.iter().chain(&overflow).collect();
    let fallback = (!all.is_empty()).then(|| FallbackDigest {
        body: fallback_body(&["No valid inline anchors were available across files.".to_string()], &all, limits.max_body_chars),
    });

    EmissionPlan {
        summary: summary_body(relevant_files, comments.len(), overflow.len(), limits.max_body_chars),
        comments,
        overflow,
        fallback,
        relevant_files,
        limits,
    }
}

/// Summary note posted ahead of the inline comments.
pub fn summary_body(files: usize, inline: usize, overflow: usize, max_chars: usize) -> String {
    let mut body = format!(
        "{BOT_TITLE}\n\nReviewed **{files}** changed file(s); posting **{inline}** inline comment(s), one per review part."
    );
    if overflow > 0 {
        body.push_str(&format!(
            " {overflow} further part(s) exceed the per-review comment limit and are listed in a follow-up note."
        ));
    }
    body.push_str(" If a part cannot be anchored inline, it is collected in a fallback note.");
    truncate_chars(&body, max_chars)
}

/// Note listing the parts that did not land inline.
pub fn failure_note(failed: &[&MappedComment], max_chars: usize) -> String {
    let mut headline = vec!["Inline anchoring failed for these parts:".to_string()];
    for (path, parts) in group_by_file(failed) {
        headline.push(format!("- `{path}`: {} part(s)", parts.len()));
    }
    fallback_body(&headline, failed, max_chars)
}

fn fallback_body(headline: &[String], comments: &[&MappedComment], max_chars: usize) -> String {
    let mut body = vec![format!("{BOT_TITLE} (fallback)")];
    body.push(headline.join("\n"));
    body.push("\n#### Suggestions\n".to_string());
    for (path, parts) in group_by_file(comments) {
        body.push(format!("## {path}"));
        body.push(parts.join("\n\n---\n\n"));
    }
    truncate_chars(&body.join("\n\n"), max_chars)
}

fn group_by_file<'a>(comments: &[&'a MappedComment]) -> IndexMap<&'a str, Vec<&'a str>> {
    let mut grouped: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for c in comments {
        grouped.entry(c.file_path.as_str()).or_default().push(c.body.as_str());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_BODY_CHARS;
    use crate::models::PartOrigin;
    use pretty_assertions::assert_eq;

    fn comment(path: &str, body: &str, line: u32) -> MappedComment {
        MappedComment {
            file_path: path.into(),
            body: body.into(),
            anchor_line: line,
            range_start_line: None,
            origin: PartOrigin::Document,
        }
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("🤖🤖🤖", 1), "🤖");
    }

    #[test]
    fn limits_are_clamped_to_hard_caps() {
        let limits = Limits { max_body_chars: 1_000_000, max_comments: 500 }.clamped();
        assert_eq!(limits, Limits::default());
    }

    #[test]
    fn no_files_gives_empty_plan() {
        let plan = assemble(vec![comment("a.py", "x", 1)], 0, Limits::default());
        assert_eq!(plan, EmissionPlan::empty());
        assert!(!plan.has_relevant_files());
    }

    #[test]
    fn count_cap_moves_extra_to_overflow() {
        let mapped: Vec<_> = (0..5).map(|i| comment("a.py", &format!("p{i}"), i + 1)).collect();
        let plan = assemble(mapped, 1, Limits { max_body_chars: 100, max_comments: 3 });
        assert_eq!(plan.comments.len(), 3);
        assert_eq!(plan.overflow.len(), 2);
        assert_eq!(plan.mapped_count(), 5);
        assert!(plan.summary.contains("2 further part(s)"));
    }

    #[test]
    fn bodies_are_truncated() {
        let plan = assemble(vec![comment("a.py", &"x".repeat(50), 1)], 1, Limits { max_body_chars: 10, max_comments: 50 });
        assert_eq!(plan.comments[0].body.len(), 10);
    }

    #[test]
    fn digest_groups_parts_per_file() {
        let plan = assemble(
            vec![comment("a.py", "one", 1), comment("b.py", "two", 2), comment("a.py", "three", 3)],
            2,
            Limits::default(),
        );
        let digest = plan.fallback.unwrap().body;
        assert_eq!(
            digest,
            "### 🤖 Review Bot (fallback)\n\nNo valid inline anchors were available across files.\n\n\n#### Suggestions\n\n\n## a.py\n\none\n\n---\n\nthree\n\n## b.py\n\ntwo"
        );
    }

    #[test]
    fn failure_note_lists_counts() {
        let a = comment("a.py", "one", 1);
        let b = comment("a.py", "two", 2);
        let note = failure_note(&[&a, &b], MAX_BODY_CHARS);
        assert!(note.contains("Inline anchoring failed for these parts:\n- `a.py`: 2 part(s)"));
        assert!(note.contains("## a.py\n\none\n\n---\n\ntwo"));
    }
}
