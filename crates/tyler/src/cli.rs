//! Command-line surface.

use clap::{Args, Parser, Subcommand};

use crate::commands::sync::SyncOptions;
use crate::config::{DEFAULT_REPO, DocStyle};
use crate::interview::InitOptions;

const ABOUT_AFTER: &str = "\
🤖 Tyler Doc Agent - Generate comprehensive documentation with AI

Tyler explores your codebase and generates high-quality documentation with
an AI coding agent.

Configuration:
  Settings are stored in tyler.yaml. The first `tyler init` writes it; later
  runs use it for defaults. Command-line flags override both the stored
  values and the interactive prompts.

Environment:
  TYLER_AGENT_BIN   agent executable (default: claude)
  TYLER_LOG         log filter, e.g. `debug` or `tyler=trace` (default: warn)
  SKIP_CLAUDE_TEST  `true` skips the agent check and builds the prompt offline

Examples:
  $ tyler init                          Interactive setup
  $ tyler init --style comprehensive    Initialize with a given style
  $ tyler sync                          Generate documentation once
  $ tyler sync-forever                  Keep improving documentation";

const INIT_AFTER: &str = "\
Documentation styles:
  comprehensive  Full coverage with architecture, API, guides, and examples (default)
  api-focused    Detailed API reference with usage examples
  tutorial       Step-by-step guides and tutorials
  minimal        Essential documentation only

Examples:
  $ tyler init
  $ tyler init --style api-focused
  $ tyler init --repo ./my-project --output-dir documentation
  $ tyler init --style comprehensive --no-examples --yes

Creates:
  tyler.yaml                 configuration
  .tyler/prompt.md           documentation prompt
  .tyler/sync.sh             single pass script
  .tyler/tyler-forever.sh    continuous script
  .tyler/deploy-docs.sh      GitHub Pages deploy script (pages enabled)
  <output-dir>/_config.yml   Jekyll config (pages enabled)";

const SYNC_AFTER: &str = "\
Runs one documentation pass: the agent explores the codebase and creates or
updates files in the configured output directory, committing as it goes.
A pass usually takes 3-10 minutes. Requires `tyler init` first.

Examples:
  $ tyler sync
  $ tyler sync --auto-push
  $ tyler sync --repo ./my-project";

const FOREVER_AFTER: &str = "\
Runs documentation passes in a loop until stopped with Ctrl+C. Useful for the
initial documentation (let it run 30-60 minutes) and for periodic refreshes.
Changes are committed by the agent as it goes, so stopping and resuming is
safe. Requires `tyler init` first.

Examples:
  $ tyler sync-forever
  $ tyler sync-forever --repo ./my-project";

/// AI-powered documentation generation agent.
#[derive(Parser, Debug)]
#[command(name = "tyler", version, about, after_help = ABOUT_AFTER)]
pub struct Cli {
    /// Log debug diagnostics to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize Tyler in your repository.
    #[command(after_help = INIT_AFTER)]
    Init(InitArgs),
    /// Generate/update documentation once.
    #[command(after_help = SYNC_AFTER)]
    Sync(SyncArgs),
    /// Continuously improve documentation.
    #[command(name = "sync-forever", after_help = FOREVER_AFTER)]
    SyncForever(RepoArgs),
    /// Render an agent's stream-json output from stdin.
    #[command(hide = true)]
    Visualize,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Repository to document (default: ./).
    #[arg(short, long, value_name = "PATH")]
    pub repo: Option<String>,

    /// Documentation output directory (default: docs).
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<String>,

    /// Documentation style.
    #[arg(short, long, value_enum)]
    pub style: Option<DocStyle>,

    /// Generate code examples.
    #[arg(long, overrides_with = "no_examples")]
    pub examples: bool,

    /// Skip code examples generation.
    #[arg(long, overrides_with = "examples")]
    pub no_examples: bool,

    /// Set up GitHub Pages deployment.
    #[arg(long, overrides_with = "no_github_pages")]
    pub github_pages: bool,

    /// Skip GitHub Pages setup.
    #[arg(long, overrides_with = "github_pages")]
    pub no_github_pages: bool,

    /// Site title for GitHub Pages.
    #[arg(long, value_name = "TEXT")]
    pub site_title: Option<String>,

    /// Site description for GitHub Pages.
    #[arg(long, value_name = "TEXT")]
    pub site_description: Option<String>,

    /// Accept stored or default values instead of prompting.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl InitArgs {
    pub fn options(&self) -> InitOptions {
        InitOptions {
            repo: self.repo.clone(),
            output_dir: self.output_dir.clone(),
            style: self.style,
            include_examples: toggle(self.examples, self.no_examples),
            generate_github_pages: toggle(self.github_pages, self.no_github_pages),
            site_title: self.site_title.clone(),
            site_description: self.site_description.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct RepoArgs {
    /// Repository path.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_REPO)]
    pub repo: String,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Commit and push documentation changes after a successful pass.
    #[arg(long)]
    pub auto_push: bool,
}

impl SyncArgs {
    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            repo: self.repo.repo.clone(),
            auto_push: self.auto_push,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn init_without_flags_leaves_everything_unset() {
        let Command::Init(args) = parse(&["tyler", "init"]).command else {
            panic!("expected init");
        };
        let options = args.options();
        assert_eq!(options.repo, None);
        assert_eq!(options.style, None);
        assert_eq!(options.include_examples, None);
        assert_eq!(options.generate_github_pages, None);
        assert!(!args.yes);
    }

    #[test]
    fn init_flags_map_to_options() {
        let Command::Init(args) = parse(&[
            "tyler",
            "init",
            "-r",
            "./svc",
            "--output-dir",
            "site",
            "--style",
            "api-focused",
            "--no-examples",
            "--github-pages",
            "--site-title",
            "Svc",
            "-y",
        ])
        .command
        else {
            panic!("expected init");
        };
        let options = args.options();
        assert_eq!(options.repo.as_deref(), Some("./svc"));
        assert_eq!(options.output_dir.as_deref(), Some("site"));
        assert_eq!(options.style, Some(DocStyle::ApiFocused));
        assert_eq!(options.include_examples, Some(false));
        assert_eq!(options.generate_github_pages, Some(true));
        assert_eq!(options.site_title.as_deref(), Some("Svc"));
        assert!(args.yes);
    }

    #[test]
    fn last_toggle_wins() {
        let Command::Init(args) = parse(&["tyler", "init", "--no-examples", "--examples"]).command
        else {
            panic!("expected init");
        };
        assert_eq!(args.options().include_examples, Some(true));
    }

    #[test]
    fn unknown_style_is_rejected() {
        assert!(Cli::try_parse_from(["tyler", "init", "--style", "fancy"]).is_err());
    }

    #[test]
    fn sync_defaults() {
        let Command::Sync(args) = parse(&["tyler", "sync"]).command else {
            panic!("expected sync");
        };
        let options = args.options();
        assert_eq!(options.repo, "./");
        assert!(!options.auto_push);

        let Command::Sync(args) = parse(&["tyler", "sync", "--repo", "x", "--auto-push"]).command
        else {
            panic!("expected sync");
        };
        assert_eq!(args.options().repo, "x");
        assert!(args.options().auto_push);
    }

    #[test]
    fn sync_forever_and_global_verbose() {
        let cli = parse(&["tyler", "sync-forever", "-r", "lib", "-v"]);
        assert!(cli.verbose);
        let Command::SyncForever(args) = cli.command else {
            panic!("expected sync-forever");
        };
        assert_eq!(args.repo, "lib");
    }
}
