//! Interactive collection of a [`DocConfig`].
//!
//! Every field resolves the same way: a command-line value wins and is
//! never asked about; otherwise the user is asked, with the stored
//! `tyler.yaml` value (or the built-in default) pre-filled.
//!
//! Questions go through the [`Prompter`] trait. [`TerminalPrompter`] uses
//! `inquire`; [`DefaultsPrompter`] answers everything with its default and
//! backs `--yes` and non-terminal stdin.

use std::fmt;
use std::path::Path;

use inquire::error::InquireError;
use inquire::{Confirm, Select, Text};

use crate::config::{DEFAULT_OUTPUT_DIR, DEFAULT_REPO, DocConfig, DocStyle, StoredConfig};

/// Options given on the `tyler init` command line. `None` means "ask".
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub repo: Option<String>,
    pub output_dir: Option<String>,
    pub style: Option<DocStyle>,
    pub include_examples: Option<bool>,
    pub generate_github_pages: Option<bool>,
    pub site_title: Option<String>,
    pub site_description: Option<String>,
}

// ── Prompter ────────────────────────────────────────────────────────

/// Source of answers for the init interview.
pub trait Prompter {
    fn text(&mut self, message: &str, default: &str) -> Result<String, String>;
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, String>;
    fn style(&mut self, message: &str, default: DocStyle) -> Result<DocStyle, String>;
}

/// Answers every question with its default.
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn text(&mut self, _message: &str, default: &str) -> Result<String, String> {
        Ok(default.to_string())
    }

    fn confirm(&mut self, _message: &str, default: bool) -> Result<bool, String> {
        Ok(default)
    }

    fn style(&mut self, _message: &str, default: DocStyle) -> Result<DocStyle, String> {
        Ok(default)
    }
}

/// Asks on the terminal with `inquire`.
pub struct TerminalPrompter;

struct StyleChoice(DocStyle);

impl fmt::Display for StyleChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.label())
    }
}

fn prompt_error(e: InquireError) -> String {
    match e {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            "setup cancelled".to_string()
        }
        other => format!("prompt failed: {other}"),
    }
}

impl Prompter for TerminalPrompter {
    fn text(&mut self, message: &str, default: &str) -> Result<String, String> {
        Text::new(message)
            .with_default(default)
            .prompt()
            .map_err(prompt_error)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, String> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(prompt_error)
    }

    fn style(&mut self, message: &str, default: DocStyle) -> Result<DocStyle, String> {
        let choices: Vec<StyleChoice> = DocStyle::ALL.into_iter().map(StyleChoice).collect();
        let cursor = DocStyle::ALL
            .iter()
            .position(|s| *s == default)
            .unwrap_or_default();
        Select::new(message, choices)
            .with_starting_cursor(cursor)
            .prompt()
            .map(|choice| choice.0)
            .map_err(prompt_error)
    }
}

// ── Interview ───────────────────────────────────────────────────────

/// Last path component of the repository, used in default site text.
pub fn repo_name(base: &Path) -> String {
    base.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "project".to_string())
}

/// Build the final config from command-line options, the stored config,
/// and the prompter's answers.
///
/// `repo_name_of` maps the chosen repository string to the name used in
/// the default site title and description.
pub fn collect(
    options: &InitOptions,
    stored: Option<&StoredConfig>,
    prompter: &mut dyn Prompter,
    repo_name_of: impl Fn(&str) -> String,
) -> Result<DocConfig, String> {
    let stored = stored.cloned().unwrap_or_default();

    let repo = match &options.repo {
        Some(repo) => repo.clone(),
        None => {
            let default = stored.repo.as_deref().unwrap_or(DEFAULT_REPO);
            prompter.text("Repository to document:", default)?
        }
    };

    let output_dir = match &options.output_dir {
        Some(dir) => dir.clone(),
        None => {
            let default = stored.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR);
            prompter.text("Documentation output directory:", default)?
        }
    };

    let style = match options.style {
        Some(style) => style,
        None => prompter.style("Documentation style:", stored.style.unwrap_or_default())?,
    };

    let include_examples = match options.include_examples {
        Some(v) => v,
        None => prompter.confirm(
            "Generate code examples and usage patterns?",
            stored.include_examples.unwrap_or(true),
        )?,
    };

    let generate_github_pages = match options.generate_github_pages {
        Some(v) => v,
        None => prompter.confirm(
            "Setup GitHub Pages deployment?",
            stored.generate_github_pages.unwrap_or(true),
        )?,
    };

    let (site_title, site_description) = if generate_github_pages {
        let name = repo_name_of(&repo);
        let title = match &options.site_title {
            Some(t) => t.clone(),
            None => {
                let default = stored
                    .site_title
                    .clone()
                    .unwrap_or_else(|| format!("{name} Documentation"));
                prompter.text("Site title for GitHub Pages:", &default)?
            }
        };
        let description = match &options.site_description {
            Some(d) => d.clone(),
            None => {
                let default = stored
                    .site_description
                    .clone()
                    .unwrap_or_else(|| format!("Comprehensive documentation for {name}"));
                prompter.text("Site description:", &default)?
            }
        };
        (Some(title), Some(description))
    } else {
        (None, None)
    };

    Ok(DocConfig {
        repo,
        output_dir,
        style,
        include_examples,
        generate_github_pages,
        site_title,
        site_description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned answers and records which questions were asked.
    #[derive(Default)]
    struct Scripted {
        texts: VecDeque<String>,
        confirms: VecDeque<bool>,
        styles: VecDeque<DocStyle>,
        asked: Vec<(String, String)>,
    }

    impl Prompter for Scripted {
        fn text(&mut self, message: &str, default: &str) -> Result<String, String> {
            self.asked.push((message.to_string(), default.to_string()));
            Ok(self.texts.pop_front().unwrap_or_else(|| default.to_string()))
        }

        fn confirm(&mut self, message: &str, default: bool) -> Result<bool, String> {
            self.asked.push((message.to_string(), default.to_string()));
            Ok(self.confirms.pop_front().unwrap_or(default))
        }

        fn style(&mut self, message: &str, default: DocStyle) -> Result<DocStyle, String> {
            self.asked.push((message.to_string(), default.to_string()));
            Ok(self.styles.pop_front().unwrap_or(default))
        }
    }

    fn name(_: &str) -> String {
        "acme".to_string()
    }

    #[test]
    fn defaults_prompter_yields_builtin_defaults() {
        let config = collect(&InitOptions::default(), None, &mut DefaultsPrompter, name).unwrap();
        assert_eq!(config.repo, "./");
        assert_eq!(config.output_dir, "docs");
        assert_eq!(config.style, DocStyle::Comprehensive);
        assert!(config.include_examples);
        assert!(config.generate_github_pages);
        assert_eq!(config.site_title.as_deref(), Some("acme Documentation"));
        assert_eq!(
            config.site_description.as_deref(),
            Some("Comprehensive documentation for acme")
        );
    }

    #[test]
    fn cli_values_are_never_asked() {
        let options = InitOptions {
            repo: Some("svc".into()),
            output_dir: Some("site".into()),
            style: Some(DocStyle::Minimal),
            include_examples: Some(false),
            generate_github_pages: Some(false),
            ..Default::default()
        };
        let mut prompter = Scripted::default();
        let config = collect(&options, None, &mut prompter, name).unwrap();

        assert!(prompter.asked.is_empty());
        assert_eq!(config.repo, "svc");
        assert_eq!(config.output_dir, "site");
        assert_eq!(config.style, DocStyle::Minimal);
        assert!(!config.include_examples);
        assert_eq!(config.site_title, None);
        assert_eq!(config.site_description, None);
    }

    #[test]
    fn stored_values_prefill_questions() {
        let stored = StoredConfig {
            output_dir: Some("handbook".into()),
            style: Some(DocStyle::Tutorial),
            include_examples: Some(false),
            site_title: Some("The Handbook".into()),
            ..Default::default()
        };
        let mut prompter = Scripted::default();
        let config = collect(&InitOptions::default(), Some(&stored), &mut prompter, name).unwrap();

        assert_eq!(config.output_dir, "handbook");
        assert_eq!(config.style, DocStyle::Tutorial);
        assert!(!config.include_examples);
        assert_eq!(config.site_title.as_deref(), Some("The Handbook"));
        assert!(prompter.asked.contains(&(
            "Documentation output directory:".to_string(),
            "handbook".to_string()
        )));
    }

    #[test]
    fn cli_beats_stored_values() {
        let stored = StoredConfig {
            style: Some(DocStyle::Tutorial),
            ..Default::default()
        };
        let options = InitOptions {
            style: Some(DocStyle::ApiFocused),
            ..Default::default()
        };
        let config = collect(&options, Some(&stored), &mut DefaultsPrompter, name).unwrap();
        assert_eq!(config.style, DocStyle::ApiFocused);
    }

    #[test]
    fn declining_pages_skips_site_questions() {
        let mut prompter = Scripted {
            confirms: VecDeque::from([true, false]),
            ..Default::default()
        };
        let config = collect(&InitOptions::default(), None, &mut prompter, name).unwrap();

        assert!(!config.generate_github_pages);
        assert_eq!(config.site_title, None);
        assert!(!prompter.asked.iter().any(|(q, _)| q.starts_with("Site")));
    }

    #[test]
    fn answers_override_defaults() {
        let mut prompter = Scripted {
            texts: VecDeque::from([
                "./lib".to_string(),
                "reference".to_string(),
                "Lib Docs".to_string(),
                "Everything about lib".to_string(),
            ]),
            styles: VecDeque::from([DocStyle::ApiFocused]),
            ..Default::default()
        };
        let config = collect(&InitOptions::default(), None, &mut prompter, name).unwrap();

        assert_eq!(config.repo, "./lib");
        assert_eq!(config.output_dir, "reference");
        assert_eq!(config.style, DocStyle::ApiFocused);
        assert_eq!(config.site_title.as_deref(), Some("Lib Docs"));
        assert_eq!(config.site_description.as_deref(), Some("Everything about lib"));
    }

    #[test]
    fn prompter_errors_abort() {
        struct Cancel;
        impl Prompter for Cancel {
            fn text(&mut self, _: &str, _: &str) -> Result<String, String> {
                Err("setup cancelled".into())
            }
            fn confirm(&mut self, _: &str, _: bool) -> Result<bool, String> {
                Err("setup cancelled".into())
            }
            fn style(&mut self, _: &str, _: DocStyle) -> Result<DocStyle, String> {
                Err("setup cancelled".into())
            }
        }
        let err = collect(&InitOptions::default(), None, &mut Cancel, name).unwrap_err();
        assert_eq!(err, "setup cancelled");
    }

    #[test]
    fn repo_name_uses_last_component() {
        assert_eq!(repo_name(Path::new("/work/acme-api")), "acme-api");
        assert_eq!(repo_name(Path::new("/")), "project");
    }
}
