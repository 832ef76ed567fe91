//! Structural extraction - reduce large code files to their skeleton
//!
//! This is a line-prefix heuristic, not a parser. It over-includes nothing
//! that does not start with a code keyword and may miss multi-line
//! signatures; both are accepted.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::core::paths::extension_of;
use crate::core::rules::{
    LanguageFamily, MIN_EXTRACTED_CONTENT, STRUCTURE_THRESHOLD, TRUNCATE_LINES_HEAD,
    TRUNCATE_LINES_TAIL,
};
use crate::core::util::truncate_string;

/// Marker appended to a successful keyword extraction
pub const OMITTED_MARKER: &str = "\n... (full implementation details omitted for brevity)";

/// Marker appended when falling back to a raw prefix
pub const TRUNCATED_MARKER: &str = "\n... (truncated for brevity)";

/// Lines inserted between head and tail of an unrecognized file
const ELISION_LINES: [&str; 3] = ["...", "# Content truncated for brevity", "..."];

/// Strategy that condenses one file's content
///
/// `extension` has no leading dot. Implementations must be pure and must not
/// fail; the selector relies on getting a string back for every file.
pub trait StructureExtractor {
    fn extract(&self, content: &str, extension: &str) -> String;
}

/// Keyword-prefix extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl StructureExtractor for HeuristicExtractor {
    fn extract(&self, content: &str, extension: &str) -> String {
        extract_structure(content, extension)
    }
}

/// Condense `content` according to the language family of `extension`
pub fn extract_structure(content: &str, extension: &str) -> String {
    if content.len() < STRUCTURE_THRESHOLD {
        return content.to_string();
    }

    let lines: Vec<&str> = content.split('\n').collect();
    let family = LanguageFamily::from_extension(extension);

    let kept: Vec<&str> = match family {
        LanguageFamily::Other => {
            if lines.len() <= TRUNCATE_LINES_HEAD + TRUNCATE_LINES_TAIL {
                return content.to_string();
            }
            let mut kept = Vec::with_capacity(TRUNCATE_LINES_HEAD + TRUNCATE_LINES_TAIL + 3);
            kept.extend_from_slice(&lines[..TRUNCATE_LINES_HEAD]);
            kept.extend_from_slice(&ELISION_LINES);
            kept.extend_from_slice(&lines[lines.len() - TRUNCATE_LINES_TAIL..]);
            kept
        }
        _ => {
            let prefixes = family.prefixes();
            lines
                .into_iter()
                .filter(|line| {
                    let stripped = line.trim();
                    prefixes.iter().any(|p| stripped.starts_with(p))
                })
                .collect()
        }
    };

    let joined = kept.join("\n");
    if joined.len() < MIN_EXTRACTED_CONTENT {
        let (head, _) = truncate_string(content, STRUCTURE_THRESHOLD);
        return head + TRUNCATED_MARKER;
    }

    joined + OMITTED_MARKER
}

/// Run the structure command on a single file
pub fn run_structure(path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let content = String::from_utf8_lossy(&bytes);
    println!("{}", extract_structure(&content, &extension_of(path)));
    Ok(())
}
