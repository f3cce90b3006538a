//! revanchor — anchor generated review feedback onto pull-request diffs.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use revanchor::config::Config;
use revanchor::constants::ENV_GITHUB_TOKEN;
use revanchor::diff;
use revanchor::env::Env;
use revanchor::github::{self, GithubClient, PullRequestContext};
use revanchor::models::DocumentSource;
use revanchor::output::PlanRenderer;
use revanchor::output::github::GithubRenderer;
use revanchor::pipeline::ReviewPipeline;
use revanchor::publish::{CommentSink, DryRunSink};

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::args::{Cli, Command, GithubArgs, Overrides, PlanArgs, RulesArgs};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("revanchor=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("revanchor=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Plan(args) => run_plan(args).await,
        Command::Github(args) => run_github(args).await,
        Command::Rules(args) => run_rules(args).await,
    }
}

/// Repository root for `path`, or the directory itself outside git.
async fn resolve_root(path: &Path) -> Result<PathBuf> {
    let base_dir = std::fs::canonicalize(path)
        .with_context(|| format!("--path directory not found: {}", path.display()))?;
    Ok(diff::git::find_repo_root(&base_dir).await.unwrap_or(base_dir))
}

/// Layered config with CLI flags on top.
fn load_config(root: &Path, overrides: &Overrides) -> Result<Config> {
    let mut config = Config::load(Some(root), &Env::real()).context("failed to load configuration")?;
    overrides.apply(&mut config);
    Ok(config)
}

async fn load_document(arg: &str) -> Result<String> {
    diff::file::read_document(&DocumentSource::from_arg(arg))
        .await
        .with_context(|| format!("failed to read review document {arg}"))
}

/// Plan comments for a local diff and print them.
async fn run_plan(args: PlanArgs) -> Result<()> {
    let source = args.validate_input().map_err(|e| anyhow::anyhow!("{e}"))?;
    let root = resolve_root(&args.path).await?;
    let config = load_config(&root, &args.overrides)?;

    let document = load_document(&args.document).await?;
    let diffs = diff::load_diffs(&source, &root).await.context("failed to read diff")?;
    let files = diff::collect_local_changes(&root, diffs, &config.review.extensions).await;
    info!(files = files.len(), "collected changed files");

    let plan = ReviewPipeline::from_config(&config).plan(&files, &document);
    print!("{}", args.format.render(&plan));
    Ok(())
}

/// Plan and post comments on the pull request described by the Actions environment.
async fn run_github(args: GithubArgs) -> Result<()> {
    let env = Env::real();
    let root = resolve_root(&args.path).await?;
    let config = load_config(&root, &args.overrides)?;

    let document = load_document(&args.document).await?;
    let pr = PullRequestContext::from_env(&env).context("not running on a pull request event")?;
    let token = env.require(ENV_GITHUB_TOKEN)?;
    info!(repo = %pr.repo_path(), number = pr.number, "reviewing pull request");

    let client = GithubClient::new(&config.github.api_url, token, config.github.timeout_secs, pr)?;
    let files = github::collect_changed_files(&client, &config.review.extensions)
        .await
        .context("failed to list pull request files")?;

    let sink: &dyn CommentSink = if args.dry_run { &DryRunSink } else { &client };
    let pipeline = ReviewPipeline::from_config(&config);
    let (plan, report) = github::review_files(&files, &document, &pipeline, sink).await?;

    if args.dry_run {
        let renderer = GithubRenderer {
            commit_id: Some(client.pull_request().head_sha.clone()),
        };
        println!("{}", renderer.render(&plan));
    }
    info!(
        posted = report.posted,
        failed = report.failed,
        fallback = report.fallback_posted,
        "review complete"
    );
    Ok(())
}

/// List the rule catalogue with each rule's state under the current config.
async fn run_rules(args: RulesArgs) -> Result<()> {
    let root = resolve_root(&args.path).await?;
    let config = load_config(&root, &Overrides::default())?;
    print!("{}", cli::render_rule_catalogue(&config.rules.rule_set()));
    Ok(())
}
