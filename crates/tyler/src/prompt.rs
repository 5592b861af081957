//! Prompts for the documentation agent.
//!
//! [`meta_prompt`] asks the agent to write the prompt that every later
//! sync feeds back to it. [`offline_prompt`] builds a serviceable prompt
//! locally when the agent is not consulted.

use crate::config::DocConfig;

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// The `<requirements>` block describing what the user asked for.
fn requirements(config: &DocConfig) -> String {
    let mut lines = vec![
        format!("Repository: {}", config.repo),
        format!("Output Directory: {}", config.output_dir),
        format!("Style: {}", config.style.brief()),
        format!("Include Examples: {}", yes_no(config.include_examples)),
        format!("GitHub Pages: {}", yes_no(config.generate_github_pages)),
    ];
    if let Some(title) = &config.site_title {
        lines.push(format!("Site Title: {title}"));
    }
    if let Some(description) = &config.site_description {
        lines.push(format!("Site Description: {description}"));
    }
    format!("<requirements>\n{}\n</requirements>", lines.join("\n"))
}

const EXAMPLE_PROMPTS: &str = "\
<example_prompts>
Example 1 (Comprehensive):
Your job is to create and maintain comprehensive documentation for this codebase in the docs/ directory.

DOCUMENTATION STRUCTURE:
1. docs/index.md - Overview and quick start
2. docs/architecture/ - System architecture and design decisions
3. docs/api/ - Detailed API reference
4. docs/guides/ - How-to guides and tutorials
5. docs/examples/ - Code examples and usage patterns
6. docs/contributing/ - Contributing guidelines

DOCUMENTATION PRINCIPLES:
- Be thorough but concise - every word should add value
- Include working code examples that developers can copy-paste
- Explain the \"why\" not just the \"what\"
- Create clear diagrams for complex flows (use mermaid syntax)
- Keep documentation cohesive - link related concepts
- Update docs/ directory incrementally, commit after each major documentation file

WORKFLOW:
1. Explore the codebase systematically - understand architecture, components, APIs
2. Create documentation structure in docs/
3. Generate comprehensive documentation files
4. Add code examples that actually work
5. Create navigation and cross-references
6. Set up GitHub Pages with _config.yml
7. Commit and push changes

Use docs/.agent/ as your scratchpad for exploration notes and TODO tracking.

Example 2 (API-Focused):
Your job is to create detailed API reference documentation for this codebase.

Focus on documenting:
- Public APIs and their usage
- Function signatures with parameter descriptions
- Return types and error handling
- Code examples for each major API
- Best practices and common patterns

Create docs/ directory with:
- docs/index.md - API overview
- docs/api/ - Organized API reference
- docs/examples/ - Usage examples

Make commits after documenting each major API or module.
</example_prompts>";

/// Prompt sent to the agent to produce the repository's documentation prompt.
pub fn meta_prompt(config: &DocConfig) -> String {
    format!(
        "\
Your task is to generate an optimized prompt for a documentation agent. This agent will explore \
a codebase and create high-quality, comprehensive documentation.

The documentation should be BETTER than platforms like Mintlify - more coherent, better \
organized, and more useful for developers.

{requirements}

{EXAMPLE_PROMPTS}

Your job: Generate a prompt matching this format that will guide a Claude Code agent to create \
exceptional documentation for the specified repository. The prompt should be clear, actionable, \
and result in documentation that surpasses typical auto-generated docs.

Explore the repository CURSORILY to understand its structure and purpose. Use ONLY read tools \
(Read, Glob, Grep). Don't use subagents.

Respond with EXACTLY the prompt and nothing else.",
        requirements = requirements(config),
    )
}

/// Documentation prompt built without consulting the agent.
pub fn offline_prompt(config: &DocConfig) -> String {
    let out = &config.output_dir;
    let mut sections = vec![
        format!(
            "Your job is to create comprehensive documentation for the {} repository in the \
             {out}/ directory.",
            config.repo
        ),
        format!(
            "Create documentation with the following structure:\n\
             - {out}/index.md - Overview and getting started\n\
             - {out}/architecture/ - Architecture documentation\n\
             - {out}/api/ - API reference\n\
             - {out}/guides/ - User guides"
        ),
        format!("Focus on {}.", config.style.brief()),
    ];

    if config.include_examples {
        sections.push("Include working code examples throughout the documentation.".to_string());
    }

    if config.generate_github_pages {
        let mut pages = vec!["Setup GitHub Pages with Jekyll configuration.".to_string()];
        if let Some(title) = &config.site_title {
            pages.push(format!("Site Title: {title}"));
        }
        if let Some(description) = &config.site_description {
            pages.push(format!("Site Description: {description}"));
        }
        sections.push(pages.join("\n"));
    }

    sections.push("Make a commit after creating each major documentation section.".to_string());
    sections.push(format!("Use {out}/.agent/ as a scratchpad for your work."));

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocStyle;

    #[test]
    fn meta_prompt_carries_requirements() {
        let config = DocConfig {
            repo: "./svc".into(),
            output_dir: "site".into(),
            style: DocStyle::Tutorial,
            include_examples: false,
            site_title: Some("Svc Docs".into()),
            ..Default::default()
        };
        let prompt = meta_prompt(&config);
        assert!(prompt.contains("Repository: ./svc"));
        assert!(prompt.contains("Output Directory: site"));
        assert!(prompt.contains("Style: step-by-step tutorials"));
        assert!(prompt.contains("Include Examples: No"));
        assert!(prompt.contains("GitHub Pages: Yes"));
        assert!(prompt.contains("Site Title: Svc Docs"));
        assert!(!prompt.contains("Site Description"));
        assert!(prompt.contains("<example_prompts>"));
        assert!(prompt.ends_with("Respond with EXACTLY the prompt and nothing else."));
    }

    #[test]
    fn meta_prompt_keeps_example_wording() {
        let prompt = meta_prompt(&DocConfig::default());
        assert!(prompt.contains("BETTER than platforms like Mintlify"));
        assert!(prompt.contains("- Explain the \"why\" not just the \"what\"\n"));
        assert!(prompt.contains("will guide a Claude Code agent to create"));
        assert!(prompt.contains("Use ONLY read tools (Read, Glob, Grep). Don't use subagents."));
    }

    #[test]
    fn offline_prompt_uses_output_dir() {
        let config = DocConfig {
            output_dir: "handbook".into(),
            ..Default::default()
        };
        let prompt = offline_prompt(&config);
        assert!(prompt.contains("handbook/index.md"));
        assert!(prompt.contains("Use handbook/.agent/ as a scratchpad"));
    }

    #[test]
    fn offline_prompt_omits_disabled_sections() {
        let config = DocConfig {
            include_examples: false,
            generate_github_pages: false,
            ..Default::default()
        };
        let prompt = offline_prompt(&config);
        assert!(!prompt.contains("code examples"));
        assert!(!prompt.contains("GitHub Pages"));
        assert!(prompt.contains("Make a commit"));
    }
}
