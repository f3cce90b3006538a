//! GitHub boundary: pull-request context, file collection, and posting.

pub mod client;
pub mod event;

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::diff::select_files;
use crate::env::MissingVar;
use crate::models::{ChangedFile, EmissionPlan};
use crate::pipeline::ReviewPipeline;
use crate::publish::{CommentSink, PublishError, PublishReport, SinkError, publish};

pub use client::{GithubClient, PrFile};
pub use event::PullRequestContext;

/// Errors from talking to GitHub.
#[derive(Error, Debug)]
pub enum GithubError {
    #[error(transparent)]
    MissingEnv(#[from] MissingVar),

    #[error("failed to read event payload {path}: {source}")]
    ReadEvent {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid pull request event: {0}")]
    InvalidEvent(String),

    #[error("GitHub API error: {0}")]
    Api(String),

    #[error("GitHub request failed: {0}")]
    Http(#[from] SinkError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Note posted when the pull request touches no reviewable file.
pub const NO_RELEVANT_FILES_NOTE: &str = "🤖 Review Bot: No relevant file changes detected.";

/// Convert pull-request files into changed files.
///
/// Removed files and unaccepted extensions are skipped. A file whose
/// content cannot be fetched keeps `content = None`.
pub async fn collect_changed_files(
    client: &GithubClient,
    extensions: &[String],
) -> Result<Vec<ChangedFile>, GithubError> {
    let listed = client.list_files().await?;
    let mut files = Vec::new();
    for pr_file in listed {
        if pr_file.is_removed() || !ChangedFile::matches_extensions(&pr_file.filename, extensions) {
            continue;
        }
        let content = match client.fetch_content(&pr_file.filename).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(path = %pr_file.filename, error = %e, "could not fetch file content");
                None
            }
        };
        files.push(ChangedFile::from_patch(
            pr_file.filename,
            pr_file.patch.as_deref().unwrap_or_default(),
            content,
        ));
    }
    Ok(select_files(files, extensions))
}

/// Plan and post a review for already collected files.
///
/// Posts the "no relevant files" note instead when `files` is empty.
pub async fn review_files(
    files: &[ChangedFile],
    document: &str,
    pipeline: &ReviewPipeline,
    sink: &dyn CommentSink,
) -> Result<(EmissionPlan, PublishReport), GithubError> {
    let plan = pipeline.plan(files, document);
    if !plan.has_relevant_files() {
        info!("no relevant file changes, posting note");
        sink.post_note(NO_RELEVANT_FILES_NOTE).await?;
        return Ok((plan, PublishReport::default()));
    }
    let report = publish(&plan, sink).await?;
    Ok((plan, report))
}
