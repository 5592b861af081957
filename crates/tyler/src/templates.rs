//! Writes the files `tyler init` leaves behind.
//!
//! Scripts are static templates with `${repo}` / `${outputDir}`
//! placeholders. The Jekyll config is serialized rather than templated so
//! arbitrary site titles stay valid YAML.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::config::{DocConfig, TYLER_DIR};

const SYNC_TEMPLATE: &str = include_str!("../templates/sync.sh.template");
const FOREVER_TEMPLATE: &str = include_str!("../templates/tyler-forever.sh.template");
const DEPLOY_TEMPLATE: &str = include_str!("../templates/deploy-docs.sh.template");

pub const PROMPT_FILE: &str = "prompt.md";
pub const SYNC_SCRIPT: &str = "sync.sh";
pub const FOREVER_SCRIPT: &str = "tyler-forever.sh";
pub const DEPLOY_SCRIPT: &str = "deploy-docs.sh";
pub const JEKYLL_CONFIG: &str = "_config.yml";

const GITIGNORE: &str = "# Tyler runtime files\nclaude_output.jsonl\n*.log\n";

/// Replace every `${key}` in `template` with its value.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("${{{key}}}"), value)
    })
}

/// `<base>/.tyler/<name>`
pub fn script_path(base: &Path, name: &str) -> PathBuf {
    base.join(TYLER_DIR).join(name)
}

#[derive(Serialize)]
struct RelativeLinks {
    enabled: bool,
    collections: bool,
}

#[derive(Serialize)]
struct JekyllConfig<'a> {
    title: &'a str,
    description: &'a str,
    theme: &'a str,
    markdown: &'a str,
    plugins: Vec<&'a str>,
    relative_links: RelativeLinks,
    include: Vec<&'a str>,
}

/// Jekyll `_config.yml` for the documentation site.
pub fn jekyll_config(config: &DocConfig) -> Result<String, String> {
    let doc = JekyllConfig {
        title: config.site_title.as_deref().unwrap_or_default(),
        description: config.site_description.as_deref().unwrap_or_default(),
        theme: "jekyll-theme-cayman",
        markdown: "kramdown",
        plugins: vec!["jekyll-relative-links"],
        relative_links: RelativeLinks {
            enabled: true,
            collections: true,
        },
        include: vec!["README.md"],
    };
    serde_yaml::to_string(&doc).map_err(|e| format!("failed to serialize Jekyll config: {e}"))
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<(), String> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|e| format!("failed to make {} executable: {e}", path.display()))
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<(), String> {
    Ok(())
}

async fn write_file(path: &Path, contents: &str, executable: bool) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| format!("failed to write {}: {e}", path.display()))?;

    if executable {
        make_executable(path).await?;
    }
    debug!("wrote {}", path.display());
    Ok(())
}

/// Write the prompt, scripts, and (when pages are enabled) the deploy
/// script and Jekyll config under `base`. Returns the written paths in
/// order.
pub async fn materialize(
    base: &Path,
    config: &DocConfig,
    prompt: &str,
) -> Result<Vec<PathBuf>, String> {
    let vars = [
        ("repo", config.repo.as_str()),
        ("outputDir", config.output_dir.as_str()),
    ];
    let mut files = vec![
        (script_path(base, PROMPT_FILE), prompt.to_string(), false),
        (script_path(base, SYNC_SCRIPT), render(SYNC_TEMPLATE, &vars), true),
        (script_path(base, FOREVER_SCRIPT), render(FOREVER_TEMPLATE, &vars), true),
    ];
    if config.generate_github_pages {
        files.push((script_path(base, DEPLOY_SCRIPT), render(DEPLOY_TEMPLATE, &vars), true));
        files.push((
            base.join(&config.output_dir).join(JEKYLL_CONFIG),
            jekyll_config(config)?,
            false,
        ));
    }
    files.push((script_path(base, ".gitignore"), GITIGNORE.to_string(), false));

    let mut written = Vec::with_capacity(files.len());
    for (path, contents, executable) in files {
        write_file(&path, &contents, executable).await?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_every_occurrence() {
        let out = render(
            "${repo} -> ${outputDir}/${outputDir} ${other}",
            &[("repo", "./svc"), ("outputDir", "site")],
        );
        assert_eq!(out, "./svc -> site/site ${other}");
    }

    #[test]
    fn rendered_scripts_have_no_placeholders_left() {
        let vars = [("repo", "./"), ("outputDir", "docs")];
        for template in [SYNC_TEMPLATE, FOREVER_TEMPLATE, DEPLOY_TEMPLATE] {
            let out = render(template, &vars);
            assert!(out.starts_with("#!/usr/bin/env bash"));
            assert!(!out.contains("${repo}"));
            assert!(!out.contains("${outputDir}"));
        }
    }

    #[test]
    fn jekyll_config_survives_yaml_metacharacters() {
        let config = DocConfig {
            site_title: Some("Acme: docs # v2".into()),
            site_description: Some("- not a list".into()),
            ..Default::default()
        };
        let yaml = jekyll_config(&config).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["title"].as_str(), Some("Acme: docs # v2"));
        assert_eq!(parsed["description"].as_str(), Some("- not a list"));
        assert_eq!(parsed["theme"].as_str(), Some("jekyll-theme-cayman"));
        assert_eq!(parsed["relative_links"]["collections"].as_bool(), Some(true));
        assert_eq!(parsed["plugins"][0].as_str(), Some("jekyll-relative-links"));
    }

    #[tokio::test]
    async fn materialize_with_pages() {
        let dir = tempfile::tempdir().unwrap();
        let config = DocConfig {
            output_dir: "site".into(),
            site_title: Some("T".into()),
            site_description: Some("D".into()),
            ..Default::default()
        };
        let written = materialize(dir.path(), &config, "PROMPT").await.unwrap();

        let tyler = dir.path().join(".tyler");
        assert_eq!(
            written,
            vec![
                tyler.join("prompt.md"),
                tyler.join("sync.sh"),
                tyler.join("tyler-forever.sh"),
                tyler.join("deploy-docs.sh"),
                dir.path().join("site/_config.yml"),
                tyler.join(".gitignore"),
            ]
        );
        assert_eq!(std::fs::read_to_string(tyler.join("prompt.md")).unwrap(), "PROMPT");
        let sync = std::fs::read_to_string(tyler.join("sync.sh")).unwrap();
        assert!(sync.contains("mkdir -p \"site/.agent\""));
        let gitignore = std::fs::read_to_string(tyler.join(".gitignore")).unwrap();
        assert!(gitignore.contains("claude_output.jsonl"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            for script in ["sync.sh", "tyler-forever.sh", "deploy-docs.sh"] {
                let mode = std::fs::metadata(tyler.join(script)).unwrap().permissions().mode();
                assert_eq!(mode & 0o777, 0o755, "{script}");
            }
        }
    }

    #[tokio::test]
    async fn materialize_without_pages_skips_deploy_and_jekyll() {
        let dir = tempfile::tempdir().unwrap();
        let config = DocConfig {
            generate_github_pages: false,
            ..Default::default()
        };
        let written = materialize(dir.path(), &config, "PROMPT").await.unwrap();

        assert_eq!(written.len(), 4);
        assert!(!dir.path().join(".tyler/deploy-docs.sh").exists());
        assert!(!dir.path().join("docs/_config.yml").exists());
    }
}
