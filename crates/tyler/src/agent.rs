//! The external documentation agent (the `claude` CLI).
//!
//! Tyler never talks to a model directly. It runs the agent headless with
//! `--output-format stream-json`, where every stdout line is one JSON
//! event, and turns those lines into [`AgentEvent`]s.
//!
//! | Line `type` | Event |
//! |-------------|-------|
//! | `assistant` | [`AgentEvent::Text`] / [`AgentEvent::ToolUse`] per content block |
//! | `user` | [`AgentEvent::ToolResult`] per tool result block |
//! | `result` | [`AgentEvent::Finished`] |
//! | anything else | ignored |

use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, trace, warn};

/// Environment variable overriding the agent executable.
pub const AGENT_BIN_ENV: &str = "TYLER_AGENT_BIN";

/// When set to `true`, skip the smoke test and build the prompt offline.
pub const SKIP_AGENT_ENV: &str = "SKIP_CLAUDE_TEST";

pub const DEFAULT_AGENT_BIN: &str = "claude";

/// How long the smoke test may take.
pub const SMOKE_TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimum trimmed reply length for the smoke test to count as working.
const SMOKE_TEST_MIN_REPLY: usize = 10;

/// Tools the agent may use while drafting the documentation prompt.
const PROMPT_TOOLS: &str = "Read,Glob,Grep";

/// Whether `SKIP_CLAUDE_TEST=true` is set.
pub fn agent_checks_skipped() -> bool {
    std::env::var(SKIP_AGENT_ENV).is_ok_and(|v| v == "true")
}

// ── Stream events ───────────────────────────────────────────────────

/// One thing the agent reported while running.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// Assistant prose.
    Text(String),
    /// The agent invoked a tool.
    ToolUse { name: String, input: Value },
    /// A tool call completed.
    ToolResult { is_error: bool },
    /// Final event of a run.
    Finished(RunSummary),
}

/// Contents of the terminal `result` event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    pub is_error: bool,
    pub result: Option<String>,
    pub num_turns: Option<u32>,
    pub duration_ms: Option<u64>,
    pub total_cost_usd: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamLine {
    Assistant {
        message: StreamMessage,
    },
    User {
        message: StreamMessage,
    },
    #[serde(rename = "result")]
    Final {
        #[serde(default)]
        is_error: bool,
        #[serde(default)]
        result: Option<String>,
        #[serde(default)]
        num_turns: Option<u32>,
        #[serde(default)]
        duration_ms: Option<u64>,
        #[serde(default)]
        total_cost_usd: Option<f64>,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug)]
struct StreamMessage {
    #[serde(default)]
    content: MessageContent,
}

/// `content` is a block list, but plain strings occur in user messages.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum MessageContent {
    Blocks(Vec<ContentBlock>),
    Plain(#[allow(dead_code)] String),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Blocks(Vec::new())
    }
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        name: String,
        #[serde(default)]
        input: Value,
    },
    ToolResult {
        #[serde(default)]
        is_error: Option<bool>,
    },
    #[serde(other)]
    Other,
}

/// Parse one stdout line of a stream-json run.
///
/// Returns `None` for lines that are not JSON events at all, and an empty
/// list for events that carry nothing of interest.
pub fn parse_stream_line(line: &str) -> Option<Vec<AgentEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Some(Vec::new());
    }
    let parsed: StreamLine = match serde_json::from_str(line) {
        Ok(p) => p,
        Err(e) => {
            trace!("not a stream event ({e}): {line}");
            return None;
        }
    };

    let events = match parsed {
        StreamLine::Assistant { message } | StreamLine::User { message } => {
            let MessageContent::Blocks(blocks) = message.content else {
                return Some(Vec::new());
            };
            blocks
                .into_iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } if !text.trim().is_empty() => {
                        Some(AgentEvent::Text(text))
                    }
                    ContentBlock::ToolUse { name, input } => {
                        Some(AgentEvent::ToolUse { name, input })
                    }
                    ContentBlock::ToolResult { is_error } => Some(AgentEvent::ToolResult {
                        is_error: is_error.unwrap_or(false),
                    }),
                    _ => None,
                })
                .collect()
        }
        StreamLine::Final {
            is_error,
            result,
            num_turns,
            duration_ms,
            total_cost_usd,
        } => vec![AgentEvent::Finished(RunSummary {
            is_error,
            result,
            num_turns,
            duration_ms,
            total_cost_usd,
        })],
        StreamLine::Other => Vec::new(),
    };
    Some(events)
}

/// The most telling argument of a tool call: its file path, search
/// pattern (quoted), directory, or the first line of a shell command.
pub fn tool_call_target(input: &Value) -> Option<String> {
    let field = |key: &str| input.get(key).and_then(Value::as_str);
    if let Some(path) = field("file_path") {
        return Some(path.to_string());
    }
    if let Some(pattern) = field("pattern") {
        return Some(format!("\"{pattern}\""));
    }
    if let Some(path) = field("path") {
        return Some(path.to_string());
    }
    field("command").map(|c| c.lines().next().unwrap_or_default().to_string())
}

// ── Smoke test ──────────────────────────────────────────────────────

/// Why the agent smoke test failed.
#[derive(Debug, Clone, PartialEq)]
pub enum SmokeTestError {
    /// The agent could not be run, exited non-zero, or timed out.
    Unavailable(String),
    /// The agent ran but replied with (almost) nothing.
    UnexpectedOutput(String),
}

impl fmt::Display for SmokeTestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmokeTestError::Unavailable(reason) => write!(f, "agent unavailable: {reason}"),
            SmokeTestError::UnexpectedOutput(out) => {
                write!(f, "agent replied with unexpected output: {out:?}")
            }
        }
    }
}

// ── Agent ───────────────────────────────────────────────────────────

/// Handle on the agent executable.
#[derive(Debug, Clone)]
pub struct Agent {
    program: String,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT_BIN)
    }
}

impl Agent {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `$TYLER_AGENT_BIN`, falling back to `claude`.
    pub fn from_env() -> Self {
        match std::env::var(AGENT_BIN_ENV) {
            Ok(bin) if !bin.trim().is_empty() => Self::new(bin),
            _ => Self::default(),
        }
    }

    /// Ask the agent to say hi and check that it answers.
    pub async fn smoke_test(&self, timeout: Duration) -> Result<(), SmokeTestError> {
        debug!("smoke testing agent `{}`", self.program);
        let output = Command::new(&self.program)
            .args(["-p", "say hi"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(timeout, output).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(SmokeTestError::Unavailable(format!(
                    "failed to run {}: {e}",
                    self.program
                )));
            }
            Err(_) => {
                return Err(SmokeTestError::Unavailable(format!(
                    "no reply within {}s",
                    timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SmokeTestError::Unavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let reply = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if reply.chars().count() < SMOKE_TEST_MIN_REPLY {
            return Err(SmokeTestError::UnexpectedOutput(reply));
        }
        Ok(())
    }

    /// Run the agent headless on `prompt` with read-only tools and return
    /// the text of its final result.
    ///
    /// `on_event` sees every event as it arrives. The child is killed if
    /// the returned future is dropped.
    pub async fn generate(
        &self,
        prompt: &str,
        workdir: &Path,
        mut on_event: impl FnMut(&AgentEvent),
    ) -> Result<String, String> {
        debug!(
            "running agent `{}` in {} ({} byte prompt)",
            self.program,
            workdir.display(),
            prompt.len()
        );
        let mut child = Command::new(&self.program)
            .args([
                "-p",
                "--output-format",
                "stream-json",
                "--verbose",
                "--allowedTools",
                PROMPT_TOOLS,
            ])
            .current_dir(workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to run {}: {e}", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(|e| format!("failed to send prompt to agent: {e}"))?;
            // Dropping stdin closes it so the agent starts working.
        }

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| "agent stdout was not captured".to_string())?;
        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut text = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut text).await;
            }
            text
        });

        let mut lines = BufReader::new(stdout).lines();
        let mut summary: Option<RunSummary> = None;
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| format!("failed to read agent output: {e}"))?
        {
            let Some(events) = parse_stream_line(&line) else {
                continue;
            };
            for event in &events {
                on_event(event);
                if let AgentEvent::Finished(s) = event {
                    summary = Some(s.clone());
                }
            }
            if summary.is_some() {
                break;
            }
        }

        drop(lines);
        let status = child
            .wait()
            .await
            .map_err(|e| format!("failed to wait for agent: {e}"))?;
        debug!("agent exited with {status}");
        let stderr_text = stderr_task.await.unwrap_or_default();

        match summary {
            Some(s) if s.is_error => Err(s
                .result
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "agent reported an error".to_string())),
            Some(s) => s
                .result
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .ok_or_else(|| "Failed to generate documentation prompt".to_string()),
            None if !status.success() => {
                warn!("agent stderr: {}", stderr_text.trim());
                Err(format!(
                    "{} exited with {status}: {}",
                    self.program,
                    stderr_text.trim()
                ))
            }
            None => Err("Failed to generate documentation prompt".to_string()),
        }
    }
}
