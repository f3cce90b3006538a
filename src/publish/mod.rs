//! Post an emission plan through a comment sink.
//!
//! Posting is sequential in plan order and never retried. Rejected inline
//! comments are recorded and reported in a single follow-up note; when no
//! inline comment lands at all, the plan's fallback digest is posted
//! instead, so a run with relevant files always leaves visible output.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::assemble::failure_note;
use crate::models::{EmissionPlan, MappedComment};

/// An individual post failed.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("rejected with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),
}

/// A note that had to be delivered was not.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to post fallback note: {0}")]
    FallbackNote(#[source] SinkError),
}

/// Destination for planned comments.
#[async_trait]
pub trait CommentSink: Send + Sync {
    /// Post the summary review body.
    async fn post_summary(&self, body: &str) -> Result<(), SinkError>;

    /// Post one inline comment at its anchor.
    async fn post_inline(&self, comment: &MappedComment) -> Result<(), SinkError>;

    /// Post a non-inline note.
    async fn post_note(&self, body: &str) -> Result<(), SinkError>;
}

/// Outcome of one publishing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub posted: usize,
    pub failed: usize,
    pub fallback_posted: bool,
}

impl PublishReport {
    pub fn any_posted(&self) -> bool {
        self.posted > 0
    }
}

/// Post `plan` through `sink`.
pub async fn publish(plan: &EmissionPlan, sink: &dyn CommentSink) -> Result<PublishReport, PublishError> {
    let mut report = PublishReport::default();
    if !plan.has_relevant_files() {
        return Ok(report);
    }

    if let Err(e) = sink.post_summary(&plan.summary).await {
        warn!(error = %e, "summary review was not posted");
    }

    let mut failed: Vec<&MappedComment> = Vec::new();
    for comment in &plan.comments {
        match sink.post_inline(comment).await {
            Ok(()) => {
                info!(path = %comment.file_path, line = comment.anchor_line, "inline comment posted");
                report.posted += 1;
            }
            Err(e) => {
                warn!(path = %comment.file_path, line = comment.anchor_line, error = %e, "inline comment rejected");
                failed.push(comment);
            }
        }
    }
    report.failed = failed.len();

    let note = if report.posted == 0 {
        plan.fallback.as_ref().map(|d| d.body.clone())
    } else {
        failed.extend(&plan.overflow);
        (!failed.is_empty()).then(|| failure_note(&failed, plan.limits.max_body_chars))
    };

    if let Some(body) = note {
        sink.post_note(&body).await.map_err(PublishError::FallbackNote)?;
        report.fallback_posted = true;
        info!(posted = report.posted, failed = report.failed, "fallback note posted");
    } else {
        info!(posted = report.posted, "inline comments posted");
    }
    Ok(report)
}

/// Sink that only logs what would be posted.
#[derive(Debug, Default)]
pub struct DryRunSink;

#[async_trait]
impl CommentSink for DryRunSink {
    async fn post_summary(&self, body: &str) -> Result<(), SinkError> {
        info!(chars = body.chars().count(), "[dry-run] summary review");
        Ok(())
    }

    async fn post_inline(&self, comment: &MappedComment) -> Result<(), SinkError> {
        info!(
            path = %comment.file_path,
            line = comment.anchor_line,
            start_line = ?comment.range_start_line,
            "[dry-run] inline comment"
        );
        Ok(())
    }

    async fn post_note(&self, body: &str) -> Result<(), SinkError> {
        info!(chars = body.chars().count(), "[dry-run] note");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::{Limits, assemble};
    use crate::models::PartOrigin;
    use std::sync::Mutex;

    /// Accepts inline comments on the listed lines only.
    #[derive(Default)]
    struct LineFilterSink {
        accept: Vec<u32>,
        notes: Mutex<Vec<String>>,
        fail_notes: bool,
    }

    #[async_trait]
    impl CommentSink for LineFilterSink {
        async fn post_summary(&self, _body: &str) -> Result<(), SinkError> {
            Err(SinkError::Transport("summary endpoint down".into()))
        }

        async fn post_inline(&self, comment: &MappedComment) -> Result<(), SinkError> {
            if self.accept.contains(&comment.anchor_line) {
                Ok(())
            } else {
                Err(SinkError::Rejected { status: 422, message: "line not in diff".into() })
            }
        }

        async fn post_note(&self, body: &str) -> Result<(), SinkError> {
            if self.fail_notes {
                return Err(SinkError::Transport("timeout".into()));
            }
            self.notes.lock().unwrap().push(body.to_string());
            Ok(())
        }
    }

    fn plan(lines: &[u32], max_comments: usize) -> EmissionPlan {
        let mapped = lines
            .iter()
            .map(|&line| MappedComment {
                file_path: "a.py".into(),
                body: format!("part at {line}"),
                anchor_line: line,
                range_start_line: None,
                origin: PartOrigin::Document,
            })
            .collect();
        assemble(mapped, 1, Limits { max_body_chars: 65_000, max_comments })
    }

    #[tokio::test]
    async fn all_accepted_posts_no_note() {
        let sink = LineFilterSink { accept: vec![1, 2], ..Default::default() };
        let report = publish(&plan(&[1, 2], 50), &sink).await.unwrap();
        assert_eq!(report, PublishReport { posted: 2, failed: 0, fallback_posted: false });
        assert!(sink.notes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_failure_posts_failure_note() {
        let sink = LineFilterSink { accept: vec![1], ..Default::default() };
        let report = publish(&plan(&[1, 2], 50), &sink).await.unwrap();
        assert!(report.any_posted());
        assert_eq!(report.failed, 1);
        let notes = sink.notes.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("- `a.py`: 1 part(s)"));
        assert!(notes[0].contains("part at 2"));
        assert!(!notes[0].contains("part at 1"));
    }

    #[tokio::test]
    async fn overflow_is_reported_in_note() {
        let sink = LineFilterSink { accept: vec![1, 2, 3], ..Default::default() };
        let report = publish(&plan(&[1, 2, 3], 2), &sink).await.unwrap();
        assert_eq!(report.posted, 2);
        assert!(report.fallback_posted);
        assert!(sink.notes.lock().unwrap()[0].contains("part at 3"));
    }

    #[tokio::test]
    async fn nothing_posted_sends_digest() {
        let sink = LineFilterSink::default();
        let plan = plan(&[4, 5], 50);
        let report = publish(&plan, &sink).await.unwrap();
        assert!(!report.any_posted());
        assert_eq!(sink.notes.lock().unwrap()[0], plan.fallback.unwrap().body);
    }

    #[tokio::test]
    async fn undeliverable_fallback_is_an_error() {
        let sink = LineFilterSink { fail_notes: true, ..Default::default() };
        let err = publish(&plan(&[4], 50), &sink).await.unwrap_err();
        assert!(err.to_string().contains("fallback note"));
    }

    #[tokio::test]
    async fn empty_plan_posts_nothing() {
        let sink = LineFilterSink { fail_notes: true, ..Default::default() };
        let report = publish(&EmissionPlan::empty(), &sink).await.unwrap();
        assert_eq!(report, PublishReport::default());
    }

    #[tokio::test]
    async fn dry_run_accepts_everything() {
        let report = publish(&plan(&[1, 2], 50), &DryRunSink).await.unwrap();
        assert_eq!(report.posted, 2);
    }
}
