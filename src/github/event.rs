//! Pull-request context from the GitHub Actions environment.

use serde::Deserialize;

use super::GithubError;
use crate::constants::{ENV_GITHUB_EVENT_PATH, ENV_GITHUB_REPOSITORY};
use crate::env::Env;

/// The pull request a run reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestContext {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub head_sha: String,
}

#[derive(Deserialize)]
struct EventPayload {
    pull_request: Option<EventPullRequest>,
    number: Option<u64>,
}

#[derive(Deserialize)]
struct EventPullRequest {
    number: u64,
    head: EventHead,
}

#[derive(Deserialize)]
struct EventHead {
    sha: String,
}

impl PullRequestContext {
    /// Read `GITHUB_REPOSITORY` and the event payload at `GITHUB_EVENT_PATH`.
    pub fn from_env(env: &Env) -> Result<Self, GithubError> {
        let repository = env.require(ENV_GITHUB_REPOSITORY)?;
        let event_path = env.require(ENV_GITHUB_EVENT_PATH)?;
        let event = std::fs::read_to_string(&event_path).map_err(|source| GithubError::ReadEvent {
            path: event_path.clone().into(),
            source,
        })?;
        Self::from_parts(&repository, &event)
    }

    /// Build from an `owner/repo` slug and the raw event JSON.
    pub fn from_parts(repository: &str, event_json: &str) -> Result<Self, GithubError> {
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty())
            .ok_or_else(|| GithubError::InvalidEvent(format!("bad repository slug: {repository}")))?;

        let payload: EventPayload = serde_json::from_str(event_json)
            .map_err(|e| GithubError::InvalidEvent(e.to_string()))?;
        let pr = payload
            .pull_request
            .ok_or_else(|| GithubError::InvalidEvent("event has no pull_request".into()))?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number: payload.number.unwrap_or(pr.number),
            head_sha: pr.head.sha,
        })
    }

    /// `repos/{owner}/{repo}` path prefix.
    pub fn repo_path(&self) -> String {
        format!("repos/{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EVENT: &str = r#"{"action":"opened","number":17,"pull_request":{"number":17,"head":{"sha":"abc123"}}}"#;

    #[test]
    fn parses_pull_request_event() {
        let ctx = PullRequestContext::from_parts("octo/app", EVENT).unwrap();
        assert_eq!(
            ctx,
            PullRequestContext {
                owner: "octo".into(),
                repo: "app".into(),
                number: 17,
                head_sha: "abc123".into(),
            }
        );
        assert_eq!(ctx.repo_path(), "repos/octo/app");
    }

    #[test]
    fn rejects_non_pr_event_and_bad_slug() {
        let push = r#"{"ref":"refs/heads/main"}"#;
        assert!(PullRequestContext::from_parts("octo/app", push).unwrap_err().to_string().contains("pull_request"));
        assert!(PullRequestContext::from_parts("octo", EVENT).is_err());
    }

    #[test]
    fn from_env_reads_event_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, EVENT).unwrap();
        let env = Env::mock([
            (ENV_GITHUB_REPOSITORY, "octo/app".to_string()),
            (ENV_GITHUB_EVENT_PATH, path.display().to_string()),
        ]);
        assert_eq!(PullRequestContext::from_env(&env).unwrap().number, 17);
    }

    #[test]
    fn from_env_requires_variables() {
        let err = PullRequestContext::from_env(&Env::mock(Vec::<(&str, &str)>::new())).unwrap_err();
        assert!(err.to_string().contains("GITHUB_REPOSITORY"));
    }
}
