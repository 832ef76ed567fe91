//! Directory survey - bounded-depth structural summary of a tree

use anyhow::Result;
use std::path::Path;
use tracing::{debug, warn};

use crate::backends::walk::repository_walker;
use crate::core::model::StructureSummary;
use crate::core::paths::{make_relative, normalize_path, relative_depth};
use crate::core::render::{RenderConfig, Renderer, ToMarkdown};

/// Survey `root` and list every file and directory up to `max_depth`
///
/// A missing root yields an empty summary. Unreadable entries are logged and
/// skipped; whatever was collected is returned.
pub fn survey(root: &Path, max_depth: usize) -> StructureSummary {
    let mut summary = StructureSummary::empty(normalize_path(root));

    if !root.exists() {
        debug!(root = %root.display(), "survey root does not exist");
        return summary;
    }

    for entry in repository_walker(root, Some(max_depth)) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry during survey");
                continue;
            }
        };

        let relative = match make_relative(entry.path(), root) {
            Some(r) if !r.is_empty() => r,
            _ => continue,
        };

        if relative_depth(&relative) > max_depth {
            continue;
        }

        let path = entry.path();
        if path.is_file() {
            summary.files.push(relative);
        } else if path.is_dir() {
            summary.directories.push(relative);
        }
    }

    summary.files.sort();
    summary.directories.sort();
    summary
}

impl ToMarkdown for StructureSummary {
    fn to_markdown(&self) -> String {
        let mut output = format!("## Structure of `{}`\n\n", self.root);

        output.push_str(&format!("### Directories ({})\n\n", self.directories.len()));
        for dir in &self.directories {
            output.push_str(&format!("- `{}/`\n", dir));
        }

        output.push_str(&format!("\n### Files ({})\n\n", self.files.len()));
        for file in &self.files {
            output.push_str(&format!("- `{}`\n", file));
        }

        output
    }
}

/// Run the survey command
pub fn run_survey(root: &Path, max_depth: usize, config: RenderConfig) -> Result<()> {
    let summary = survey(root, max_depth);

    let renderer = Renderer::with_config(config);
    renderer.render_to(&summary, std::io::stdout().lock())?;

    Ok(())
}
