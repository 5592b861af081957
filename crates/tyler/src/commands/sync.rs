//! `tyler sync` and `tyler sync-forever`.

use std::path::PathBuf;

use chrono::Local;

use crate::config::{TYLER_DIR, resolve_base_dir};
use crate::git::{self, AUTO_PUSH_MESSAGE};
use crate::runner::{RunOutcome, ScriptRunner};
use crate::templates::{FOREVER_SCRIPT, SYNC_SCRIPT, script_path};
use crate::ui;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub repo: String,
    pub auto_push: bool,
}

/// Base directory and the generated script inside it, which must exist.
async fn locate(repo: &str, script: &str) -> Result<(PathBuf, PathBuf), String> {
    let base = resolve_base_dir(repo)?;
    let path = script_path(&base, script);
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(format!(
            "{TYLER_DIR}/{script} not found. Run 'tyler init' first."
        ));
    }
    Ok((base, path))
}

/// Report a non-completed outcome. Returns an error only for failures.
fn finish(outcome: RunOutcome, label: &str) -> Result<(), String> {
    match outcome {
        RunOutcome::Completed => Ok(()),
        RunOutcome::Stopped => {
            ui::warning(&format!("{label} stopped"));
            Ok(())
        }
        RunOutcome::Interrupted => {
            ui::warning(&format!("\n{label} interrupted"));
            Ok(())
        }
        RunOutcome::Failed(detail) => {
            ui::error(&format!("\n✖ {label} failed"));
            Err(detail)
        }
    }
}

/// One documentation pass, optionally followed by commit and push.
pub async fn run(options: &SyncOptions) -> Result<(), String> {
    let (base, script) = locate(&options.repo, SYNC_SCRIPT).await?;

    ui::heading("Starting documentation generation...\n");
    let started = Local::now();
    let outcome = ScriptRunner::new(script, &base)
        .with_stop_notice("\n\nStopping documentation sync...")
        .run()
        .await?;

    if outcome != RunOutcome::Completed {
        return finish(outcome, "Documentation sync");
    }

    ui::success(&format!(
        "\n✅ Documentation sync completed successfully! ({})",
        ui::format_elapsed(Local::now() - started)
    ));

    if options.auto_push {
        ui::heading("\nPushing documentation changes...");
        match git::commit_and_push(&base, AUTO_PUSH_MESSAGE).await {
            Ok(()) => ui::success("✅ Documentation pushed successfully!"),
            Err(e) => {
                tracing::warn!("auto-push: {e}");
                ui::warning("⚠ Could not push changes (no changes to commit or push failed)");
            }
        }
    }
    Ok(())
}

/// Documentation passes in a loop until the user stops them.
pub async fn run_forever(repo: &str) -> Result<(), String> {
    let (base, script) = locate(repo, FOREVER_SCRIPT).await?;

    ui::heading("Starting continuous documentation generation...\n");
    ui::warning(
        "This will run forever, improving documentation until you stop it with Ctrl+C\n",
    );
    let started = Local::now();
    let outcome = ScriptRunner::new(script, &base)
        .with_stop_notice("\n\nStopping continuous documentation sync...")
        .run()
        .await?;

    if outcome == RunOutcome::Completed {
        ui::success("\nContinuous documentation sync finished");
    }
    ui::muted(&format!(
        "Ran for {}",
        ui::format_elapsed(Local::now() - started)
    ));
    finish(outcome, "Documentation sync")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn locate_requires_generated_script() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().to_string_lossy().into_owned();

        let err = locate(&repo, SYNC_SCRIPT).await.unwrap_err();
        assert_eq!(err, ".tyler/sync.sh not found. Run 'tyler init' first.");

        std::fs::create_dir_all(dir.path().join(".tyler")).unwrap();
        std::fs::write(dir.path().join(".tyler/sync.sh"), "exit 0\n").unwrap();
        let (base, script) = locate(&repo, SYNC_SCRIPT).await.unwrap();
        assert_eq!(base, dir.path());
        assert_eq!(script, dir.path().join(".tyler/sync.sh"));
    }

    #[test]
    fn failed_outcome_is_an_error() {
        assert!(finish(RunOutcome::Completed, "x").is_ok());
        assert!(finish(RunOutcome::Stopped, "x").is_ok());
        assert!(finish(RunOutcome::Interrupted, "x").is_ok());
        assert_eq!(
            finish(RunOutcome::Failed("exit code 2".into()), "x"),
            Err("exit code 2".to_string())
        );
    }

    #[tokio::test]
    async fn sync_runs_script_and_tolerates_push_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".tyler")).unwrap();
        std::fs::write(dir.path().join(".tyler/sync.sh"), "touch pass-ran\n").unwrap();

        let options = SyncOptions {
            repo: dir.path().to_string_lossy().into_owned(),
            auto_push: true,
        };
        assert!(run(&options).await.is_ok());
        assert!(dir.path().join("pass-ran").exists());
    }

    #[tokio::test]
    async fn sync_reports_script_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".tyler")).unwrap();
        std::fs::write(dir.path().join(".tyler/sync.sh"), "exit 4\n").unwrap();

        let options = SyncOptions {
            repo: dir.path().to_string_lossy().into_owned(),
            auto_push: false,
        };
        let err = run(&options).await.unwrap_err();
        assert!(err.contains("exit code 4"), "{err}");
    }
}
