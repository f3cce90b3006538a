//! Minimal GitHub REST client for pull-request reviews.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::GithubError;
use super::event::PullRequestContext;
use crate::constants::{APP_NAME, VERSION};
use crate::models::MappedComment;
use crate::publish::{CommentSink, SinkError};

const PER_PAGE: usize = 100;

/// One entry of `GET /pulls/{n}/files`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrFile {
    pub filename: String,
    pub status: String,
    /// Absent for binary files and very large diffs.
    #[serde(default)]
    pub patch: Option<String>,
}

impl PrFile {
    pub fn is_removed(&self) -> bool {
        self.status == "removed"
    }
}

/// Authenticated client bound to one pull request.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_url: String,
    token: String,
    pr: PullRequestContext,
}

impl GithubClient {
    pub fn new(
        api_url: &str,
        token: String,
        timeout_secs: u64,
        pr: PullRequestContext,
    ) -> Result<Self, GithubError> {
        let http = Client::builder()
            .user_agent(format!("{APP_NAME}/{VERSION}"))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GithubError::Api(e.to_string()))?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            pr,
        })
    }

    pub fn pull_request(&self) -> &PullRequestContext {
        &self.pr
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.api_url, self.pr.repo_path(), path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Every file of the pull request, following pagination.
    pub async fn list_files(&self) -> Result<Vec<PrFile>, GithubError> {
        let url = self.url(&format!("pulls/{}/files", self.pr.number));
        let mut files = Vec::new();
        for page in 1.. {
            let req = self
                .http
                .get(&url)
                .query(&[("per_page", PER_PAGE), ("page", page)]);
            let batch: Vec<PrFile> = checked(self.authed(req).send().await)
                .await
                .map_err(GithubError::from)?
                .json()
                .await
                .map_err(|e| GithubError::Api(e.to_string()))?;
            let done = batch.len() < PER_PAGE;
            files.extend(batch);
            if done {
                break;
            }
        }
        debug!(count = files.len(), "listed pull request files");
        Ok(files)
    }

    /// Raw content of `path` at the head commit.
    pub async fn fetch_content(&self, path: &str) -> Result<String, GithubError> {
        let req = self
            .http
            .get(self.url(&format!("contents/{path}")))
            .query(&[("ref", self.pr.head_sha.as_str())]);
        let req = self.authed(req).header("Accept", "application/vnd.github.raw");
        checked(req.send().await)
            .await
            .map_err(GithubError::from)?
            .text()
            .await
            .map_err(|e| GithubError::Api(e.to_string()))
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<(), SinkError> {
        let req = self.authed(self.http.post(self.url(path))).json(payload);
        checked(req.send().await).await.map(|_| ())
    }
}

/// Map transport errors and non-2xx statuses to [`SinkError`].
async fn checked(result: reqwest::Result<Response>) -> Result<Response, SinkError> {
    let response = result.map_err(|e| SinkError::Transport(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    Err(SinkError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// Body of `POST /pulls/{n}/reviews` for the summary.
pub fn review_payload(body: &str, commit_id: Option<&str>) -> Value {
    let mut payload = json!({ "body": body, "event": "COMMENT" });
    if let Some(sha) = commit_id {
        payload["commit_id"] = json!(sha);
    }
    payload
}

/// Body of `POST /pulls/{n}/comments` for one inline comment.
pub fn inline_payload(comment: &MappedComment, commit_id: &str) -> Value {
    let mut payload = json!({
        "body": comment.body,
        "commit_id": commit_id,
        "path": comment.file_path,
        "side": "RIGHT",
        "line": comment.anchor_line,
    });
    if let Some(start) = comment.range_start_line.filter(|&s| s < comment.anchor_line) {
        payload["start_line"] = json!(start);
        payload["start_side"] = json!("RIGHT");
    }
    payload
}

#[async_trait]
impl CommentSink for GithubClient {
    async fn post_summary(&self, body: &str) -> Result<(), SinkError> {
        let payload = review_payload(body, Some(&self.pr.head_sha));
        self.post(&format!("pulls/{}/reviews", self.pr.number), &payload).await
    }

    async fn post_inline(&self, comment: &MappedComment) -> Result<(), SinkError> {
        let payload = inline_payload(comment, &self.pr.head_sha);
        self.post(&format!("pulls/{}/comments", self.pr.number), &payload).await
    }

    async fn post_note(&self, body: &str) -> Result<(), SinkError> {
        self.post(&format!("issues/{}/comments", self.pr.number), &json!({ "body": body }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PartOrigin;
    use pretty_assertions::assert_eq;

    fn context() -> PullRequestContext {
        PullRequestContext {
            owner: "octo".into(),
            repo: "app".into(),
            number: 7,
            head_sha: "deadbeef".into(),
        }
    }

    fn comment(range_start_line: Option<u32>) -> MappedComment {
        MappedComment {
            file_path: "src/app.py".into(),
            body: "Use `with`.".into(),
            anchor_line: 12,
            range_start_line,
            origin: PartOrigin::Document,
        }
    }

    #[test]
    fn inline_payload_targets_right_side() {
        assert_eq!(
            inline_payload(&comment(None), "deadbeef"),
            json!({
                "body": "Use `with`.",
                "commit_id": "deadbeef",
                "path": "src/app.py",
                "side": "RIGHT",
                "line": 12,
            })
        );
    }

    #[test]
    fn inline_payload_with_range() {
        let payload = inline_payload(&comment(Some(10)), "deadbeef");
        assert_eq!(payload["start_line"], 10);
        assert_eq!(payload["start_side"], "RIGHT");

        let same_line = inline_payload(&comment(Some(12)), "deadbeef");
        assert!(same_line.get("start_line").is_none());
    }

    #[test]
    fn review_payload_is_comment_event() {
        assert_eq!(review_payload("hi", None), json!({ "body": "hi", "event": "COMMENT" }));
        assert_eq!(review_payload("hi", Some("abc"))["commit_id"], "abc");
    }

    #[test]
    fn urls_are_built_from_api_root() {
        let client = GithubClient::new("https://ghe.example.com/api/v3/", "t".into(), 30, context()).unwrap();
        assert_eq!(
            client.url("pulls/7/files"),
            "https://ghe.example.com/api/v3/repos/octo/app/pulls/7/files"
        );
    }

    #[test]
    fn pr_file_tolerates_missing_patch() {
        let files: Vec<PrFile> = serde_json::from_str(
            r#"[{"filename":"a.py","status":"modified","patch":"@@ -1 +1 @@\n-a\n+b"},{"filename":"logo.png","status":"removed"}]"#,
        )
        .unwrap();
        assert_eq!(files[0].patch.as_deref(), Some("@@ -1 +1 @@\n-a\n+b"));
        assert!(files[1].is_removed());
        assert_eq!(files[1].patch, None);
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let client = GithubClient::new("http://127.0.0.1:9", "t".into(), 2, context()).unwrap();
        let err = client.post_note("hello").await.unwrap_err();
        assert!(matches!(err, SinkError::Transport(_)));
    }
}
