//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use colored::Colorize;
use strum::IntoEnumIterator;

use revanchor::rules::{Rule, RuleSet};

/// Human-readable listing of the rule catalogue, marking disabled rules.
pub fn render_rule_catalogue(active: &RuleSet) -> String {
    let mut out = String::new();
    for rule in Rule::iter() {
        let status = if active.rules().contains(&rule) {
            "on".green().bold()
        } else {
            "off".dimmed()
        };
        out.push_str(&format!("  {:<20} {:<4} {}\n", rule.id().bold(), status, rule.title()));
        out.push_str(&format!("  {:<20}      {}\n", "", rule.message().dimmed()));
    }
    out
}
