//! Thin wrappers over the `git` executable.

use std::path::Path;

use tokio::process::Command;
use tracing::debug;

/// Commit message used by `tyler sync --auto-push`.
pub const AUTO_PUSH_MESSAGE: &str = "docs: Update documentation via Tyler";

/// Run a git command in `workdir` and return its stdout.
///
/// A non-zero exit becomes an error carrying the exit code and stderr.
pub async fn run_git(workdir: &Path, args: &[&str]) -> Result<String, String> {
    debug!("git {} (in {})", args.join(" "), workdir.display());
    let output = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .output()
        .await
        .map_err(|e| format!("failed to run git: {e}"))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return Ok(stdout);
    }

    let code = output.status.code().unwrap_or(-1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = if stderr.trim().is_empty() {
        stdout.trim()
    } else {
        stderr.trim()
    };
    Err(format!("git {} failed [exit: {code}]: {detail}", args.join(" ")))
}

/// Whether `dir` is inside a git work tree.
pub async fn is_git_repo(dir: &Path) -> bool {
    run_git(dir, &["rev-parse", "--git-dir"]).await.is_ok()
}

/// Stage everything, commit, and push. Stops at the first failing step.
pub async fn commit_and_push(workdir: &Path, message: &str) -> Result<(), String> {
    run_git(workdir, &["add", "."]).await?;
    run_git(workdir, &["commit", "-m", message]).await?;
    run_git(workdir, &["push"]).await?;
    Ok(())
}
