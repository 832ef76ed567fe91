//! Repository content flow - survey, select, condense and assemble
//!
//! Produces the single Markdown document that is embedded in a
//! documentation prompt. Every failure below the root check degrades into
//! the output instead of propagating.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::backends::select::select_files;
use crate::backends::structure::{HeuristicExtractor, StructureExtractor};
use crate::backends::survey::survey;
use crate::core::file_reader::read_bounded;
use crate::core::model::{ContentReport, ExtractOptions, FileCandidate};
use crate::core::paths::normalize_path;
use crate::core::rules::{is_verbatim, HEADER_DIRECTORY_LIMIT, HEADER_SURVEY_DEPTH};
use crate::core::tokenizer::{count_tokens, TokenModel};

/// Returned instead of a document when the root does not exist
pub const NOT_FOUND_MESSAGE: &str = "Repository directory not found.";

/// Extract the content of the repository at `root` with the heuristic extractor
pub fn extract_repository_content(root: &Path, opts: &ExtractOptions) -> String {
    build_content(root, opts, &HeuristicExtractor).text
}

/// Extract the content of the repository at `root` with a given extractor
pub fn build_content(
    root: &Path,
    opts: &ExtractOptions,
    extractor: &dyn StructureExtractor,
) -> ContentReport {
    if !root.exists() {
        warn!(root = %root.display(), "repository directory not found");
        return ContentReport {
            text: NOT_FOUND_MESSAGE.to_string(),
            ..Default::default()
        };
    }

    let mut output = String::from("# Repository Structure and Content\n");
    push_structure_header(&mut output, root);

    let selection = select_files(root, opts);
    info!(
        files = selection.files.len(),
        bytes = selection.total_bytes,
        "selected repository files"
    );

    output.push_str(&format!(
        "\n## Code Files ({} files included, ~{}KB total)\n",
        selection.files.len(),
        selection.total_bytes / 1024
    ));

    for candidate in &selection.files {
        push_file_section(&mut output, candidate, opts.max_file_bytes, extractor);
    }

    ContentReport {
        text: output,
        included: selection
            .files
            .iter()
            .map(|c| c.relative.clone())
            .collect(),
        total_bytes: selection.total_bytes,
    }
}

fn push_structure_header(output: &mut String, root: &Path) {
    let structure = survey(root, HEADER_SURVEY_DEPTH);

    output.push_str("\n## Directory Structure\n");
    output.push_str(&format!("Root: {}\n", normalize_path(root)));

    if !structure.directories.is_empty() {
        output.push_str(&format!(
            "\nDirectories ({}):\n",
            structure.directories.len()
        ));
        for dir in structure.directories.iter().take(HEADER_DIRECTORY_LIMIT) {
            output.push_str(&format!("  - {}\n", dir));
        }
    }
}

fn push_file_section(
    output: &mut String,
    candidate: &FileCandidate,
    max_file_bytes: u64,
    extractor: &dyn StructureExtractor,
) {
    output.push_str(&format!("\n### File: {}\n", candidate.relative));

    let read = match read_bounded(&candidate.path, max_file_bytes) {
        Ok(read) => read,
        Err(err) => {
            warn!(path = %candidate.relative, error = %err, "failed to read selected file");
            output.push_str(&format!("Error reading file: {}\n", err));
            return;
        }
    };

    output.push_str(&format!("```{}\n", candidate.extension));
    if is_verbatim(&candidate.extension, candidate.file_name()) {
        output.push_str(&read.content);
        if read.hit_limit {
            output.push_str("\n... (truncated)");
        }
    } else {
        let extracted = extractor.extract(&read.content, &candidate.extension);
        debug!(
            path = %candidate.relative,
            before = read.content.len(),
            after = extracted.len(),
            "condensed code file"
        );
        output.push_str(&extracted);
    }
    output.push_str("\n```\n");
}

/// Run the extract command
pub fn run_extract(
    root: &Path,
    opts: ExtractOptions,
    show_stats: bool,
    token_model: TokenModel,
) -> Result<()> {
    let report = build_content(root, &opts, &HeuristicExtractor);
    println!("{}", report.text);

    if show_stats {
        eprintln!("Extraction Statistics:");
        eprintln!("   Files: {}", report.included.len());
        eprintln!("   Bytes: {}", report.total_bytes);
        eprintln!("   Characters: {}", report.text.chars().count());
        eprintln!(
            "   Tokens: {} (model: {})",
            count_tokens(&report.text, token_model),
            token_model
        );
        eprintln!("   Options: {}", serde_json::to_string(&opts)?);
    }

    Ok(())
}
