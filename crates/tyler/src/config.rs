//! Documentation configuration and the `tyler.yaml` store.
//!
//! [`DocConfig`] is the complete record written by `tyler init`.
//! [`StoredConfig`] is its lenient counterpart used when reading the file
//! back as defaults: every key is optional, and an unknown style is dropped
//! instead of failing the whole load.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Name of the configuration file, relative to the repository root.
pub const CONFIG_FILE: &str = "tyler.yaml";

/// Directory holding the generated prompt and scripts.
pub const TYLER_DIR: &str = ".tyler";

pub const DEFAULT_REPO: &str = "./";
pub const DEFAULT_OUTPUT_DIR: &str = "docs";

// ── DocStyle ────────────────────────────────────────────────────────

/// Flavor of documentation the agent is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DocStyle {
    /// Full coverage with architecture, API, guides, and examples.
    #[default]
    Comprehensive,
    /// Detailed API reference with usage examples.
    ApiFocused,
    /// Step-by-step guides and tutorials.
    Tutorial,
    /// Essential documentation only.
    Minimal,
}

impl DocStyle {
    pub const ALL: [DocStyle; 4] = [
        DocStyle::Comprehensive,
        DocStyle::ApiFocused,
        DocStyle::Tutorial,
        DocStyle::Minimal,
    ];

    /// Identifier used on the command line and in `tyler.yaml`.
    pub fn as_str(self) -> &'static str {
        match self {
            DocStyle::Comprehensive => "comprehensive",
            DocStyle::ApiFocused => "api-focused",
            DocStyle::Tutorial => "tutorial",
            DocStyle::Minimal => "minimal",
        }
    }

    /// Human-readable label shown in the interactive style picker.
    pub fn label(self) -> &'static str {
        match self {
            DocStyle::Comprehensive => {
                "Comprehensive - Full coverage with architecture, API, guides, and examples"
            }
            DocStyle::ApiFocused => "API-Focused - Detailed API reference with usage examples",
            DocStyle::Tutorial => "Tutorial - Step-by-step guides and tutorials",
            DocStyle::Minimal => "Minimal - Essential documentation only",
        }
    }

    /// What this style means, phrased for the agent.
    pub fn brief(self) -> &'static str {
        match self {
            DocStyle::Comprehensive => {
                "comprehensive documentation covering architecture, API reference, guides, \
                 tutorials, and examples"
            }
            DocStyle::ApiFocused => {
                "detailed API reference documentation with usage examples and best practices"
            }
            DocStyle::Tutorial => "step-by-step tutorials and guides for common use cases",
            DocStyle::Minimal => "essential documentation covering core concepts and basic usage",
        }
    }
}

impl fmt::Display for DocStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s.trim())
            .ok_or_else(|| {
                format!(
                    "unknown documentation style '{s}' (expected comprehensive, api-focused, \
                     tutorial, or minimal)"
                )
            })
    }
}

// ── DocConfig ───────────────────────────────────────────────────────

/// Configuration for documenting one repository.
///
/// Serialized with camelCase keys; unset site fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocConfig {
    /// Repository to document, as entered. Default: `"./"`.
    pub repo: String,
    /// Documentation output directory, relative to the repository. Default: `"docs"`.
    pub output_dir: String,
    /// Documentation style. Default: [`DocStyle::Comprehensive`].
    pub style: DocStyle,
    /// Ask the agent for code examples. Default: `true`.
    pub include_examples: bool,
    /// Emit Jekyll config and a deploy script for GitHub Pages. Default: `true`.
    pub generate_github_pages: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_description: Option<String>,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            repo: DEFAULT_REPO.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            style: DocStyle::default(),
            include_examples: true,
            generate_github_pages: true,
            site_title: None,
            site_description: None,
        }
    }
}

impl DocConfig {
    /// Absolute directory this config documents.
    pub fn base_dir(&self) -> Result<PathBuf, String> {
        resolve_base_dir(&self.repo)
    }
}

// ── StoredConfig ────────────────────────────────────────────────────

/// A previously saved `tyler.yaml`, read back as a source of defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredConfig {
    pub repo: Option<String>,
    pub output_dir: Option<String>,
    pub style: Option<DocStyle>,
    pub include_examples: Option<bool>,
    pub generate_github_pages: Option<bool>,
    pub site_title: Option<String>,
    pub site_description: Option<String>,
}

/// Raw file shape; `style` stays a string so a typo doesn't discard the rest.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawStoredConfig {
    repo: Option<String>,
    output_dir: Option<String>,
    style: Option<String>,
    include_examples: Option<bool>,
    generate_github_pages: Option<bool>,
    site_title: Option<String>,
    site_description: Option<String>,
}

impl StoredConfig {
    /// Parse the contents of a `tyler.yaml` file.
    pub fn parse(content: &str) -> Result<Self, String> {
        let raw: Option<RawStoredConfig> =
            serde_yaml::from_str(content).map_err(|e| format!("invalid {CONFIG_FILE}: {e}"))?;
        let raw = raw.unwrap_or_default();

        let style = match raw.style.as_deref().map(str::parse::<DocStyle>) {
            Some(Ok(style)) => Some(style),
            Some(Err(e)) => {
                warn!("ignoring stored style: {e}");
                None
            }
            None => None,
        };

        Ok(Self {
            repo: raw.repo,
            output_dir: raw.output_dir,
            style,
            include_examples: raw.include_examples,
            generate_github_pages: raw.generate_github_pages,
            site_title: raw.site_title,
            site_description: raw.site_description,
        })
    }
}

// ── Store ───────────────────────────────────────────────────────────

/// Resolve a repository argument to an absolute directory.
///
/// `""` and `"./"` mean the current working directory.
pub fn resolve_base_dir(repo: &str) -> Result<PathBuf, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("failed to read current directory: {e}"))?;
    let repo = repo.trim();
    if repo.is_empty() || repo == DEFAULT_REPO {
        return Ok(cwd);
    }
    Ok(cwd.join(repo))
}

/// Path of the config file inside `base`.
pub fn config_path(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Load `tyler.yaml` from `base`.
///
/// A missing or unreadable file yields `None`; so does a malformed one,
/// after logging why.
pub async fn load(base: &Path) -> Option<StoredConfig> {
    let path = config_path(base);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(c) => c,
        Err(e) => {
            debug!("no stored config at {}: {e}", path.display());
            return None;
        }
    };
    match StoredConfig::parse(&content) {
        Ok(stored) => Some(stored),
        Err(e) => {
            warn!("{}: {e}", path.display());
            None
        }
    }
}

/// Write `config` to `base/tyler.yaml`, creating `base` if needed.
pub async fn save(base: &Path, config: &DocConfig) -> Result<PathBuf, String> {
    tokio::fs::create_dir_all(base)
        .await
        .map_err(|e| format!("failed to create {}: {e}", base.display()))?;
    let yaml = serde_yaml::to_string(config)
        .map_err(|e| format!("failed to serialize config: {e}"))?;
    let path = config_path(base);
    tokio::fs::write(&path, yaml)
        .await
        .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    debug!("saved config to {}", path.display());
    Ok(path)
}
