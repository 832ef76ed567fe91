//! Table of contents - heading outline of a generated Markdown document

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::render::{RenderConfig, Renderer, ToMarkdown};

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{1,6})[ \t]+(.+)$").expect("Invalid HEADING_RE regex"));

/// One ATX heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: usize,
    pub title: String,
}

/// Heading outline of a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOfContents {
    pub headings: Vec<Heading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Collect `#`..`######` headings in document order
pub fn generate_table_of_contents(markdown: &str) -> TableOfContents {
    let headings: Vec<Heading> = HEADING_RE
        .captures_iter(markdown)
        .map(|cap| Heading {
            level: cap[1].len(),
            title: cap[2].trim().to_string(),
        })
        .collect();

    if headings.is_empty() {
        return TableOfContents {
            headings,
            message: Some("No headings found".to_string()),
        };
    }

    TableOfContents {
        headings,
        message: None,
    }
}

impl ToMarkdown for TableOfContents {
    fn to_markdown(&self) -> String {
        if let Some(message) = &self.message {
            return format!("_{}_\n", message);
        }

        let mut output = String::from("## Table of Contents\n\n");
        for heading in &self.headings {
            let indent = "  ".repeat(heading.level.saturating_sub(1));
            output.push_str(&format!("{}- {}\n", indent, heading.title));
        }
        output
    }
}

/// Run the toc command
pub fn run_toc(path: &Path, config: RenderConfig) -> Result<()> {
    let markdown =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let toc = generate_table_of_contents(&markdown);

    let renderer = Renderer::with_config(config);
    renderer.render_to(&toc, std::io::stdout().lock())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_in_order() {
        let doc = "# Title\n\nIntro\n\n## Setup  \ntext\n### Details\n###### Deep\n";
        let toc = generate_table_of_contents(doc);

        assert_eq!(
            toc.headings,
            vec![
                Heading { level: 1, title: "Title".to_string() },
                Heading { level: 2, title: "Setup".to_string() },
                Heading { level: 3, title: "Details".to_string() },
                Heading { level: 6, title: "Deep".to_string() },
            ]
        );
        assert!(toc.message.is_none());
    }

    #[test]
    fn test_not_headings() {
        let doc = "#hashtag\n ## indented\n####### seven\ntext # not heading\n";
        let toc = generate_table_of_contents(doc);
        assert!(toc.headings.is_empty());
        assert_eq!(toc.message.as_deref(), Some("No headings found"));
    }

    #[test]
    fn test_json_shape() {
        let toc = generate_table_of_contents("# A\n");
        let json = serde_json::to_string(&toc).unwrap();
        assert_eq!(json, r#"{"headings":[{"level":1,"title":"A"}]}"#);

        let empty = serde_json::to_string(&generate_table_of_contents("")).unwrap();
        assert_eq!(empty, r#"{"headings":[],"message":"No headings found"}"#);
    }

    #[test]
    fn test_markdown_indentation() {
        let md = generate_table_of_contents("# A\n## B\n").to_markdown();
        assert_eq!(md, "## Table of Contents\n\n- A\n  - B\n");
    }
}
