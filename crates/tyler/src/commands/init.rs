//! `tyler init`: interview, preflight, prompt synthesis, file generation.

use std::path::Path;

use crate::agent::{self, Agent, AgentEvent};
use crate::config::{self, CONFIG_FILE, DEFAULT_REPO, DocConfig, resolve_base_dir};
use crate::interview::{self, DefaultsPrompter, InitOptions, Prompter, TerminalPrompter, repo_name};
use crate::preflight;
use crate::prompt::{meta_prompt, offline_prompt};
use crate::runner::ShutdownSignals;
use crate::templates;
use crate::ui;

/// Run `tyler init`. With `interactive == false` every unset option takes
/// its stored or default value without asking.
pub async fn run(options: InitOptions, interactive: bool) -> Result<(), String> {
    ui::heading("🤖 Tyler Doc Agent - AI-Powered Documentation Generator\n");
    ui::info("I'll help you generate comprehensive documentation for your codebase:\n");

    let lookup = resolve_base_dir(options.repo.as_deref().unwrap_or(DEFAULT_REPO))?;
    let stored = config::load(&lookup).await;
    if stored.is_some() {
        ui::warning(&format!("Found existing {CONFIG_FILE}, using as defaults\n"));
    }

    let mut prompter: Box<dyn Prompter> = if interactive {
        Box::new(TerminalPrompter)
    } else {
        Box::new(DefaultsPrompter)
    };
    let config = interview::collect(&options, stored.as_ref(), prompter.as_mut(), |repo| {
        resolve_base_dir(repo)
            .map(|base| repo_name(&base))
            .unwrap_or_else(|_| "project".to_string())
    })?;
    let base = config.base_dir()?;
    let agent = Agent::from_env();

    preflight::run(&config.repo, &base, &agent).await?;

    config::save(&base, &config).await?;
    ui::success(&format!("✅ Saved configuration to {CONFIG_FILE}"));

    ui::heading("\nGenerating documentation prompt...");
    let prompt = match synthesize(&config, &base, &agent).await {
        Ok(Some(prompt)) => prompt,
        Ok(None) => return Ok(()),
        Err(e) => {
            ui::error("✖ Failed to generate documentation prompt");
            return Err(e);
        }
    };
    ui::success("✔ Generated documentation prompt");

    let written = templates::materialize(&base, &config, &prompt).await?;

    ui::success("\n✅ Tyler Doc Agent initialized successfully!");
    ui::heading("\nNext steps:");
    ui::info("run `tyler sync` - Generate/update documentation once\n");
    ui::info("run `tyler sync-forever` - Continuously improve documentation\n");
    ui::info("Files created:");
    for path in &written {
        ui::info(&format!("- {}", relative(path, &base)));
    }
    Ok(())
}

fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Produce the documentation prompt, either from the agent or offline.
///
/// `Ok(None)` means the user stopped generation with a signal.
async fn synthesize(config: &DocConfig, base: &Path, agent: &Agent) -> Result<Option<String>, String> {
    if agent::agent_checks_skipped() {
        return Ok(Some(offline_prompt(config)));
    }

    let meta = meta_prompt(config);
    let mut signals = ShutdownSignals::register()?;
    let mut tool_calls = 0usize;

    let result = tokio::select! {
        result = agent.generate(&meta, base, |event| {
            if let AgentEvent::ToolUse { name, input } = event {
                tool_calls += 1;
                println!("{}", ui::tool_call_line(name, input));
            }
        }) => result,
        _ = signals.recv() => {
            ui::warning("\n\nStopping prompt generation...");
            return Ok(None);
        }
    };

    if tool_calls > 0 {
        ui::muted(&format!("  Analyzed codebase with {tool_calls} tool calls"));
    }
    result.map(Some)
}
