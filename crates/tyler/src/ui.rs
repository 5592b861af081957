//! Terminal output helpers: colored status lines and step spinners.
//!
//! Everything here writes to stdout for the user. Diagnostics go through
//! `tracing` instead, so they can be filtered independently.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use crate::agent::tool_call_target;

const TICK: Duration = Duration::from_millis(80);

pub fn heading(text: &str) {
    println!("{}", text.cyan());
}

pub fn info(text: &str) {
    println!("{}", text.white());
}

pub fn success(text: &str) {
    println!("{}", text.green());
}

pub fn warning(text: &str) {
    println!("{}", text.yellow());
}

pub fn error(text: &str) {
    eprintln!("{}", text.red());
}

pub fn muted(text: &str) {
    println!("{}", text.bright_black());
}

/// `  Tool(target)` line for an agent tool call.
pub fn tool_call_line(name: &str, input: &Value) -> String {
    match tool_call_target(input) {
        Some(target) => format!("  {}({})", name.cyan(), target.green()),
        None => format!("  {}", name.cyan()),
    }
}

/// Compact `1h 02m 03s` / `4m 05s` / `6s` rendering.
pub fn format_elapsed(elapsed: chrono::TimeDelta) -> String {
    let secs = elapsed.num_seconds().max(0);
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

// ── Spinner ─────────────────────────────────────────────────────────

/// A single-line spinner that resolves to a success, warning, or failure
/// line. Hidden automatically when stdout is not a terminal; the final line
/// is printed either way.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(message.into());
        bar.enable_steady_tick(TICK);
        Self { bar }
    }

    pub fn succeed(self, message: &str) {
        self.finish(format!("{} {message}", "✔".green()));
    }

    pub fn warn(self, message: &str) {
        self.finish(format!("{} {message}", "⚠".yellow()));
    }

    pub fn fail(self, message: &str) {
        self.finish(format!("{} {message}", "✖".red()));
    }

    fn finish(self, line: String) {
        self.bar.finish_and_clear();
        println!("{line}");
    }
}
