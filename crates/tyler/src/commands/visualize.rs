//! `tyler visualize`: readable progress from an agent's stream-json output.
//!
//! The generated `sync.sh` pipes the agent through this command. Lines that
//! are not stream events pass through unchanged.

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::agent::{AgentEvent, RunSummary, parse_stream_line};
use crate::ui;

fn summary_line(summary: &RunSummary) -> String {
    let mut parts = Vec::new();
    if let Some(ms) = summary.duration_ms {
        let elapsed = chrono::TimeDelta::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX));
        parts.push(format!("in {}", ui::format_elapsed(elapsed)));
    }
    if let Some(turns) = summary.num_turns {
        parts.push(format!("{turns} turns"));
    }
    if let Some(cost) = summary.total_cost_usd {
        parts.push(format!("${cost:.2}"));
    }
    let details = if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    };

    if summary.is_error {
        let reason = summary.result.as_deref().unwrap_or("agent reported an error");
        format!("{}{details}: {reason}", "✖ Pass failed".red())
    } else {
        format!("{}{details}", "✔ Pass finished".green())
    }
}

/// Text to print for one event, if any.
pub fn render_event(event: &AgentEvent) -> Option<String> {
    match event {
        AgentEvent::Text(text) => Some(text.trim_end().to_string()),
        AgentEvent::ToolUse { name, input } => Some(ui::tool_call_line(name, input)),
        AgentEvent::ToolResult { is_error: true } => {
            Some(format!("  {}", "✖ tool call failed".red()))
        }
        AgentEvent::ToolResult { is_error: false } => None,
        AgentEvent::Finished(summary) => Some(summary_line(summary)),
    }
}

/// Render every line of `input` to stdout.
pub async fn render_stream(input: impl AsyncBufRead + Unpin) -> Result<(), String> {
    let mut lines = input.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| format!("failed to read agent output: {e}"))?
    {
        match parse_stream_line(&line) {
            Some(events) => {
                for rendered in events.iter().filter_map(render_event) {
                    println!("{rendered}");
                }
            }
            None => println!("{line}"),
        }
    }
    Ok(())
}

pub async fn run() -> Result<(), String> {
    render_stream(BufReader::new(tokio::io::stdin())).await
}
