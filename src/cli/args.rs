//! Clap argument types, validation, and config overrides.

use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

use revanchor::config::Config;
use revanchor::models::{DiffSource, EmissionPlan};
use revanchor::output::PlanRenderer;

/// Anchor generated review feedback onto a pull request's diff.
#[derive(Parser, Debug)]
#[command(name = "revanchor", version = revanchor::constants::VERSION)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG is ignored when set).
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Plan comments offline from a local diff and print them.
    Plan(PlanArgs),

    /// Plan and post comments on the current GitHub pull request.
    Github(GithubArgs),

    /// List the built-in rule checks.
    Rules(RulesArgs),
}

/// Config overrides shared by the planning commands.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Maximum inline comments per review (capped at 50).
    #[arg(long)]
    pub max_comments: Option<usize>,

    /// Maximum characters per comment body (capped at 65000).
    #[arg(long)]
    pub max_body_chars: Option<usize>,

    /// Comma-separated file suffixes to review, e.g. ".py,.pyi".
    #[arg(long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Comma-separated rule ids to switch off.
    #[arg(long, value_delimiter = ',')]
    pub disable_rule: Vec<String>,

    /// Skip all built-in rule checks.
    #[arg(long, default_value_t = false)]
    pub no_rules: bool,
}

impl Overrides {
    /// Apply CLI flags on top of a loaded config (highest priority layer).
    pub fn apply(&self, config: &mut Config) {
        if let Some(n) = self.max_comments {
            config.limits.max_comments = n;
        }
        if let Some(n) = self.max_body_chars {
            config.limits.max_body_chars = n;
        }
        config.limits = config.limits.clamped();
        if !self.extensions.is_empty() {
            config.review.extensions = self.extensions.clone();
        }
        for id in &self.disable_rule {
            if !config.rules.disabled.contains(id) {
                config.rules.disabled.push(id.clone());
            }
        }
        if self.no_rules {
            config.rules.enabled = false;
        }
    }
}

/// Arguments for the `plan` subcommand.
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Path to the repository or working directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Review document to map, or "-" for stdin.
    #[arg(long, value_name = "FILE")]
    pub document: String,

    /// Pre-computed unified diff file.
    #[arg(long)]
    pub diff_file: Option<PathBuf>,

    /// Branch or commit to diff against (uses git diff).
    #[arg(long)]
    pub diff_base: Option<String>,

    /// Output format.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub overrides: Overrides,
}

impl PlanArgs {
    /// Validate that exactly one diff source is provided.
    pub fn validate_input(&self) -> Result<DiffSource, String> {
        match (&self.diff_file, &self.diff_base) {
            (Some(_), Some(_)) => Err("only one diff source allowed: --diff-file or --diff-base".to_string()),
            (Some(path), None) => Ok(DiffSource::DiffFile(path.clone())),
            (None, Some(base)) => Ok(DiffSource::GitBase(base.clone())),
            (None, None) => Err("one diff source is required: --diff-file or --diff-base".to_string()),
        }
    }
}

/// Arguments for the `github` subcommand.
#[derive(Parser, Debug)]
pub struct GithubArgs {
    /// Repository checkout used to find `.revanchor.toml`.
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Review document to map, or "-" for stdin.
    #[arg(long, value_name = "FILE")]
    pub document: String,

    /// Fetch and plan, but log instead of posting and print the review payload.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    #[command(flatten)]
    pub overrides: Overrides,
}

/// Arguments for the `rules` subcommand.
#[derive(Parser, Debug)]
pub struct RulesArgs {
    /// Repository whose config decides which rules are active.
    #[arg(long, default_value = ".")]
    pub path: PathBuf,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
    Github,
}

impl OutputFormat {
    /// Render a plan using the renderer for this format.
    pub fn render(&self, plan: &EmissionPlan) -> String {
        use revanchor::output::{github::GithubRenderer, json::JsonRenderer, terminal::TerminalRenderer};
        match self {
            OutputFormat::Terminal => TerminalRenderer.render(plan),
            OutputFormat::Json => JsonRenderer.render(plan),
            OutputFormat::Github => GithubRenderer::default().render(plan),
        }
    }
}
