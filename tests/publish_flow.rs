//! Publishing a planned review through a recording comment sink.
//!
//! The sink accepts or rejects inline comments by line number and records
//! every call, so the tests can assert on exactly what reached the API.

use std::sync::Mutex;

use async_trait::async_trait;

use revanchor::github::{NO_RELEVANT_FILES_NOTE, review_files};
use revanchor::models::{ChangedFile, EmissionPlan, MappedComment};
use revanchor::pipeline::ReviewPipeline;
use revanchor::publish::{CommentSink, PublishError, SinkError, publish};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Summary,
    Inline(String, u32),
    Note(String),
}

/// Records every post; rejects inline comments on `rejected_lines`.
#[derive(Default)]
struct RecordingSink {
    rejected_lines: Vec<u32>,
    reject_all: bool,
    fail_notes: bool,
    calls: Mutex<Vec<Call>>,
}

impl RecordingSink {
    fn rejecting(lines: &[u32]) -> Self {
        Self {
            rejected_lines: lines.to_vec(),
            ..Self::default()
        }
    }

    fn rejecting_all() -> Self {
        Self {
            reject_all: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn notes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Note(body) => Some(body),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl CommentSink for RecordingSink {
    async fn post_summary(&self, _body: &str) -> Result<(), SinkError> {
        self.calls.lock().unwrap().push(Call::Summary);
        Ok(())
    }

    async fn post_inline(&self, comment: &MappedComment) -> Result<(), SinkError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Inline(comment.file_path.clone(), comment.anchor_line));
        if self.reject_all || self.rejected_lines.contains(&comment.anchor_line) {
            return Err(SinkError::Rejected {
                status: 422,
                message: "line must be part of the diff".into(),
            });
        }
        Ok(())
    }

    async fn post_note(&self, body: &str) -> Result<(), SinkError> {
        self.calls.lock().unwrap().push(Call::Note(body.to_string()));
        if self.fail_notes {
            return Err(SinkError::Transport("connection reset".into()));
        }
        Ok(())
    }
}

fn two_file_plan() -> EmissionPlan {
    let files = vec![
        ChangedFile::from_patch(
            "app.py",
            "@@ -1,2 +1,3 @@\n import os\n+import sys\n print(os)\n",
            None,
        ),
        ChangedFile::from_patch("util.py", "@@ -5,1 +5,2 @@\n a = 1\n+b = 2\n", None),
    ];
    let doc = "## app.py\n\n### Imports\n\nDrop `sys`.\n\n### Output\n\nUse logging.\n\n## util.py\n\nRename `b`.\n";
    ReviewPipeline::default().plan(&files, doc)
}

// ---------------------------------------------------------------------------
// Inline posting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn all_comments_land_inline() {
    let plan = two_file_plan();
    let sink = RecordingSink::default();

    let report = publish(&plan, &sink).await.unwrap();

    assert_eq!(report.posted, 3);
    assert_eq!(report.failed, 0);
    assert!(!report.fallback_posted);
    assert_eq!(
        sink.calls(),
        vec![
            Call::Summary,
            Call::Inline("app.py".into(), 2),
            Call::Inline("app.py".into(), 1),
            Call::Inline("util.py".into(), 6),
        ]
    );
}

#[tokio::test]
async fn rejected_comment_is_listed_in_one_note() {
    let plan = two_file_plan();
    let sink = RecordingSink::rejecting(&[6]);

    let report = publish(&plan, &sink).await.unwrap();

    assert_eq!(report.posted, 2);
    assert_eq!(report.failed, 1);
    assert!(report.fallback_posted);

    let notes = sink.notes();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].contains("Inline anchoring failed for these parts:"));
    assert!(notes[0].contains("- `util.py`: 1 part(s)"));
    assert!(notes[0].contains("Rename `b`."));
    assert!(!notes[0].contains("Drop `sys`."));
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn total_rejection_posts_digest_with_every_part() {
    let plan = two_file_plan();
    let sink = RecordingSink::rejecting_all();

    let report = publish(&plan, &sink).await.unwrap();

    assert!(!report.any_posted());
    assert_eq!(report.failed, 3);
    assert!(report.fallback_posted);

    let notes = sink.notes();
    assert_eq!(notes.len(), 1);
    let digest = &notes[0];
    assert!(digest.starts_with("### 🤖 Review Bot (fallback)"));
    assert!(digest.contains("No valid inline anchors were available across files."));
    assert!(digest.contains("## app.py"));
    assert!(digest.contains("## util.py"));
    for comment in &plan.comments {
        assert!(digest.contains(&comment.body));
    }
}

#[tokio::test]
async fn undeliverable_digest_is_an_error() {
    let plan = two_file_plan();
    let sink = RecordingSink {
        reject_all: true,
        fail_notes: true,
        ..RecordingSink::default()
    };

    let err = publish(&plan, &sink).await.unwrap_err();

    assert!(matches!(err, PublishError::FallbackNote(SinkError::Transport(_))));
}

// ---------------------------------------------------------------------------
// Whole review
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_change_set_posts_no_files_note() {
    let sink = RecordingSink::default();

    let (plan, report) = review_files(&[], "## app.py\n\nText.\n", &ReviewPipeline::default(), &sink)
        .await
        .unwrap();

    assert!(!plan.has_relevant_files());
    assert_eq!(report.posted, 0);
    assert_eq!(sink.calls(), vec![Call::Note(NO_RELEVANT_FILES_NOTE.to_string())]);
}
