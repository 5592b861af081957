//! AI-powered documentation generation for code repositories.
//!
//! `tyler` drives an external coding agent (the `claude` CLI by default) to
//! write and maintain a documentation site for a repository. The workflow
//! has three steps:
//!
//! 1. `tyler init` interviews the user, checks the environment, asks the
//!    agent to write a repository-specific documentation prompt, and
//!    generates the `.tyler/` scripts that run it.
//! 2. `tyler sync` runs one documentation pass.
//! 3. `tyler sync-forever` runs passes in a loop until interrupted.
//!
//! # Library usage
//!
//! ```ignore
//! use tyler::config::{DocConfig, DocStyle};
//! use tyler::prompt::offline_prompt;
//!
//! let config = DocConfig {
//!     style: DocStyle::Tutorial,
//!     ..Default::default()
//! };
//! let prompt = offline_prompt(&config);
//! ```

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod git;
pub mod interview;
pub mod logging;
pub mod preflight;
pub mod prompt;
pub mod runner;
pub mod templates;
pub mod ui;

pub use agent::{Agent, AgentEvent, RunSummary};
pub use config::{DocConfig, DocStyle, StoredConfig};
pub use runner::{RunOutcome, ScriptRunner};
