//! Git CLI wrapper for producing diffs.
//!
//! Shells out to `git` via `tokio::process::Command`.

use std::path::{Path, PathBuf};

use super::DiffError;

/// Run `git diff <base_ref>` and return the unified diff output.
pub async fn git_diff(repo_root: &Path, base_ref: &str) -> Result<String, DiffError> {
    let output = tokio::process::Command::new("git")
        .args(["diff", "--no-color", "--src-prefix=a/", "--dst-prefix=b/", base_ref])
        .current_dir(repo_root)
        .output()
        .await
        .map_err(|e| DiffError::GitError(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DiffError::GitError(format!(
            "git diff failed (exit {}): {stderr}",
            output.status
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| DiffError::GitError(format!("git output is not valid UTF-8: {e}")))
}

/// Find the root of the git repository containing `start_dir`.
pub async fn find_repo_root(start_dir: &Path) -> Result<PathBuf, DiffError> {
    let output = tokio::process::Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(start_dir)
        .output()
        .await
        .map_err(|e| DiffError::GitError(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DiffError::GitError(format!("not a git repository: {stderr}")));
    }

    Ok(PathBuf::from(String::from_utf8_lossy(&output.stdout).trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn git(dir: &Path, args: &[&str]) {
        tokio::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn git_diff_in_non_git_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = git_diff(dir.path(), "HEAD").await.unwrap_err().to_string();
        assert!(err.contains("git"), "got: {err}");
    }

    #[tokio::test]
    async fn find_repo_root_non_git() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_repo_root(dir.path()).await.unwrap_err().to_string();
        assert!(err.contains("not a git repository"), "got: {err}");
    }

    #[tokio::test]
    async fn git_diff_in_real_repo() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path();
        git(p, &["init"]).await;
        git(p, &["config", "user.email", "bot@example.com"]).await;
        git(p, &["config", "user.name", "Bot"]).await;
        tokio::fs::write(p.join("app.py"), "x = 1\n").await.unwrap();
        git(p, &["add", "."]).await;
        git(p, &["commit", "-m", "init"]).await;

        tokio::fs::write(p.join("app.py"), "x = 1\ny = eval(x)\n").await.unwrap();

        let diff = git_diff(p, "HEAD").await.unwrap();
        assert!(diff.contains("+y = eval(x)"));
        assert!(diff.contains("diff --git a/app.py b/app.py"));
    }
}
