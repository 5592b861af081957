//! Checks run by `tyler init` before anything is written.

use std::path::Path;

use colored::Colorize;

use crate::agent::{self, Agent, SMOKE_TEST_TIMEOUT, SmokeTestError};
use crate::git;
use crate::ui::{self, Spinner};

/// Verify the repository directory, its git status, and the agent.
///
/// A missing directory or a broken agent is fatal; a directory that is
/// not a git repository only earns a warning.
pub async fn run(repo: &str, base: &Path, agent: &Agent) -> Result<(), String> {
    ui::heading("\n🔍 Performing preflight checks...\n");

    ui::info("1. Checking if repository directory exists...");
    let spinner = Spinner::start(format!("   Accessing {repo}"));
    if !tokio::fs::metadata(base).await.is_ok_and(|m| m.is_dir()) {
        spinner.fail(&format!("   Repository directory {} does not exist", repo.red()));
        return Err(format!("repository directory {} does not exist", base.display()));
    }
    spinner.succeed(&format!("   Repository directory {} exists", repo.green()));

    ui::info("2. Checking if directory is a git repository...");
    let spinner = Spinner::start(format!("   Verifying git repository in {repo}"));
    if git::is_git_repo(base).await {
        spinner.succeed("   Git repository found");
    } else {
        spinner.warn(&format!(
            "   {}",
            "Not a git repository - documentation will still work but git integration \
             features will be limited"
                .yellow()
        ));
    }

    if agent::agent_checks_skipped() {
        ui::warning("3. Skipping Claude Code test (test mode)");
    } else {
        ui::info("3. Testing Claude Code configuration...");
        let spinner = Spinner::start("   Running Claude Code test command");
        match agent.smoke_test(SMOKE_TEST_TIMEOUT).await {
            Ok(()) => spinner.succeed("   Claude Code is working correctly"),
            Err(e @ SmokeTestError::UnexpectedOutput(_)) => {
                spinner.fail("   Claude Code test failed");
                return Err(e.to_string());
            }
            Err(e @ SmokeTestError::Unavailable(_)) => {
                spinner.fail("   Claude Code is not properly configured");
                ui::error("   Please run `claude` to set up your profile");
                return Err(e.to_string());
            }
        }
    }

    ui::success("\n✅ All preflight checks passed!\n");
    Ok(())
}
