//! Documentation prompt flow - clone, extract and assemble the LLM prompt
//!
//! The LLM call itself is left to the caller; this flow ends with the full
//! prompt text.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::backends::git::{is_remote_url, repo_name_from_url, TempClone};
use crate::backends::structure::HeuristicExtractor;
use crate::core::model::ExtractOptions;
use crate::core::tokenizer::{count_tokens, TokenModel};
use crate::flows::content::{build_content, NOT_FOUND_MESSAGE};

/// Default instructions used when no generic prompt is configured
pub const DEFAULT_GENERIC_PROMPT: &str = "Generate comprehensive documentation for this repository.

IMPORTANT FORMATTING REQUIREMENTS:
- Use proper Markdown heading hierarchy (# for main title, ## for sections, ### for subsections)
- Add extra blank lines before and after all headings for better spacing
- Make headings stand out: add 2 blank lines before each heading (except the first) and 1 blank line after
- Use **bold** for important terms and key concepts
- Keep paragraph text consistently formatted with single spacing between lines
- Use code blocks with syntax highlighting for code examples
- Use bullet points or numbered lists for better readability where appropriate

CONTENT STRUCTURE:
- Start with an overview/introduction
- Document the main components and their purposes
- Include usage examples where relevant
- Explain configuration options if applicable
- Describe the API or main interfaces
";

/// Inputs for one documentation prompt
#[derive(Debug, Clone, Default)]
pub struct PromptRequest {
    /// Display name; derived from the source when absent
    pub repo_name: Option<String>,
    /// Generic instructions; `DEFAULT_GENERIC_PROMPT` when absent
    pub generic_prompt: Option<String>,
    /// Repository-specific instructions
    pub specific_prompt: Option<String>,
    pub options: ExtractOptions,
    /// Encoding used for the token count in the report
    pub token_model: TokenModel,
}

/// Assembled prompt and its statistics
#[derive(Debug, Clone, Serialize)]
pub struct PromptReport {
    pub repo_name: String,
    pub prompt: String,
    pub chars: usize,
    pub tokens: usize,
    pub token_model: String,
    pub files: usize,
    pub content_bytes: u64,
}

/// Join generic and repository-specific instructions
pub fn combine_prompts(generic: &str, specific: Option<&str>) -> String {
    match specific.map(str::trim).filter(|s| !s.is_empty()) {
        Some(specific) => format!(
            "{}\n\nREPOSITORY-SPECIFIC INSTRUCTIONS:\n{}",
            generic, specific
        ),
        None => generic.to_string(),
    }
}

/// Full prompt sent to the model
pub fn build_documentation_prompt(repo_name: &str, instructions: &str, content: &str) -> String {
    format!(
        "Generate comprehensive documentation for the '{}' repository.\n\n{}\n\n{}",
        repo_name, instructions, content
    )
}

/// Build the prompt for a local directory or a remote repository URL
///
/// Anything that is neither an existing directory nor a URL is reported as
/// not found without calling git. Remote sources are shallow-cloned into a temporary directory that is
/// removed before this function returns.
pub fn prepare_prompt(source: &str, request: &PromptRequest) -> Result<PromptReport> {
    let local = Path::new(source);
    let clone;
    let root: &Path = if local.is_dir() {
        local
    } else if !is_remote_url(source) {
        warn!(source, "prompt source is neither a directory nor a repository URL");
        anyhow::bail!("{} ({})", NOT_FOUND_MESSAGE, source);
    } else {
        clone = TempClone::clone_repo(source)
            .with_context(|| format!("Failed to clone repository: {}", source))?;
        clone.path()
    };

    let repo_name = request
        .repo_name
        .clone()
        .unwrap_or_else(|| default_repo_name(source, root));

    info!(source, root = %root.display(), "extracting repository content");
    let content = build_content(root, &request.options, &HeuristicExtractor);

    let instructions = combine_prompts(
        request
            .generic_prompt
            .as_deref()
            .unwrap_or(DEFAULT_GENERIC_PROMPT),
        request.specific_prompt.as_deref(),
    );
    let prompt = build_documentation_prompt(&repo_name, &instructions, &content.text);

    let chars = prompt.chars().count();
    info!(repo = %repo_name, chars, "documentation prompt assembled");

    Ok(PromptReport {
        tokens: count_tokens(&prompt, request.token_model),
        token_model: request.token_model.to_string(),
        repo_name,
        chars,
        files: content.included.len(),
        content_bytes: content.total_bytes,
        prompt,
    })
}

fn default_repo_name(source: &str, root: &Path) -> String {
    if Path::new(source).is_dir() {
        let canonical = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        if let Some(name) = canonical.file_name() {
            return name.to_string_lossy().into_owned();
        }
    }
    repo_name_from_url(source)
}

/// Run the prompt command
pub fn run_prompt(source: &str, request: PromptRequest, show_stats: bool) -> Result<()> {
    let report = prepare_prompt(source, &request)?;
    println!("{}", report.prompt);

    if show_stats {
        eprintln!("Prompt Statistics:");
        eprintln!("   Repository: {}", report.repo_name);
        eprintln!("   Files: {}", report.files);
        eprintln!("   Content bytes: {}", report.content_bytes);
        eprintln!("   Characters: {}", report.chars);
        eprintln!(
            "   Tokens: {} (model: {})",
            report.tokens, report.token_model
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_combine_without_specific() {
        assert_eq!(combine_prompts("Generic", None), "Generic");
        assert_eq!(combine_prompts("Generic", Some("   ")), "Generic");
    }

    #[test]
    fn test_combine_with_specific() {
        assert_eq!(
            combine_prompts("Generic", Some("Focus on the CLI.")),
            "Generic\n\nREPOSITORY-SPECIFIC INSTRUCTIONS:\nFocus on the CLI."
        );
    }

    #[test]
    fn test_build_documentation_prompt() {
        let prompt = build_documentation_prompt("demo", "Do it.", "CONTENT");
        assert_eq!(
            prompt,
            "Generate comprehensive documentation for the 'demo' repository.\n\nDo it.\n\nCONTENT"
        );
    }

    #[test]
    fn test_prepare_prompt_from_local_directory() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("widget");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("README.md"), "# Widget\n").unwrap();

        let request = PromptRequest {
            specific_prompt: Some("Mention the widget.".to_string()),
            ..Default::default()
        };
        let report = prepare_prompt(&root.to_string_lossy(), &request).unwrap();

        assert_eq!(report.repo_name, "widget");
        assert_eq!(report.files, 1);
        assert!(report
            .prompt
            .starts_with("Generate comprehensive documentation for the 'widget' repository."));
        assert!(report.prompt.contains("CONTENT STRUCTURE:"));
        assert!(report
            .prompt
            .contains("REPOSITORY-SPECIFIC INSTRUCTIONS:\nMention the widget."));
        assert!(report.prompt.contains("### File: README.md"));
        assert_eq!(report.chars, report.prompt.chars().count());
        assert!(report.tokens > 0);
    }

    #[test]
    fn test_prepare_prompt_explicit_name_and_generic() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("main.py"), "print('x')").unwrap();

        let request = PromptRequest {
            repo_name: Some("custom".to_string()),
            generic_prompt: Some("Short instructions.".to_string()),
            ..Default::default()
        };
        let report = prepare_prompt(&temp.path().to_string_lossy(), &request).unwrap();

        assert!(report
            .prompt
            .starts_with("Generate comprehensive documentation for the 'custom' repository.\n\nShort instructions.\n\n# Repository Structure and Content"));
    }

    #[test]
    fn test_missing_local_path_is_not_cloned() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("my-projcet");

        let err = prepare_prompt(&missing.to_string_lossy(), &PromptRequest::default())
            .unwrap_err()
            .to_string();

        assert!(err.starts_with(NOT_FOUND_MESSAGE), "got: {}", err);
        assert!(!err.contains("clone"));
    }
}
