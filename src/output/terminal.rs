//! Terminal renderer: styled flowing text grouped by file.

use colored::Colorize;

use crate::models::{EmissionPlan, MappedComment, PartOrigin};
use crate::output::PlanRenderer;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

impl PlanRenderer for TerminalRenderer {
    fn render(&self, plan: &EmissionPlan) -> String {
        if !plan.has_relevant_files() {
            return format!("{}", "  ✔ No relevant file changes.\n".green());
        }

        let mut output = String::new();
        let mut current_file = "";

        for comment in &plan.comments {
            if comment.file_path != current_file {
                if !current_file.is_empty() {
                    output.push('\n');
                }
                current_file = &comment.file_path;
                output.push_str(&format!("{}\n", current_file.bold().underline()));
            }
            render_comment(&mut output, comment, false);
        }

        if !plan.overflow.is_empty() {
            output.push_str(&format!("\n{}\n", "Over the comment limit (sent in a note):".yellow().bold()));
            for comment in &plan.overflow {
                render_comment(&mut output, comment, true);
            }
        }

        output.push_str(&format!("{}\n", "───────────────────────────────────".dimmed()));
        output.push_str(&format!(
            " {} file(s), {} inline comment(s), {} over limit\n",
            plan.relevant_files.to_string().bold(),
            plan.comments.len().to_string().green().bold(),
            plan.overflow.len().to_string().yellow().bold(),
        ));
        output
    }
}

fn render_comment(output: &mut String, comment: &MappedComment, with_path: bool) {
    let location = match comment.range_start_line {
        Some(start) => format!("{start}-{}", comment.anchor_line),
        None => comment.anchor_line.to_string(),
    };
    let location = if with_path {
        format!("{}:{location}", comment.file_path)
    } else {
        format!("line {location}")
    };
    let origin = match &comment.origin {
        PartOrigin::Document => "document".cyan(),
        PartOrigin::Placeholder => "placeholder".dimmed(),
        PartOrigin::Rule { rule_id } => rule_id.as_str().magenta(),
    };

    output.push_str(&format!(" {} {} [{}]\n", "●".blue().bold(), location.bold(), origin));
    for line in comment.body.lines() {
        output.push_str(&format!("   {line}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(path: &str, line: u32) -> MappedComment {
        MappedComment {
            file_path: path.into(),
            body: "Rename\n```suggestion\nx = 1\n```".into(),
            anchor_line: line,
            range_start_line: None,
            origin: PartOrigin::Rule { rule_id: "unsafe-eval".into() },
        }
    }

    #[test]
    fn groups_by_file() {
        colored::control::set_override(false);
        let plan = EmissionPlan {
            comments: vec![comment("a.py", 1), comment("a.py", 4), comment("b.py", 2)],
            overflow: vec![comment("c.py", 7)],
            relevant_files: 3,
            ..Default::default()
        };
        let out = TerminalRenderer.render(&plan);
        assert_eq!(out.matches("a.py").count(), 1);
        assert!(out.contains("line 4 [unsafe-eval]"));
        assert!(out.contains("c.py:7"));
        assert!(out.contains("   ```suggestion"));
        assert!(out.contains("3 file(s), 3 inline comment(s), 1 over limit"));
    }

    #[test]
    fn empty_plan() {
        colored::control::set_override(false);
        assert!(TerminalRenderer.render(&EmissionPlan::empty()).contains("No relevant file changes"));
    }
}
