//! Renderer module
//!
//! Renders structured results (surveys, tables of contents, doctor reports)
//! as JSON or Markdown.

use serde::Serialize;
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with default options
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self {
            pretty,
            ..Self::new(format)
        }
    }
}

/// Values that have a human-readable Markdown form
pub trait ToMarkdown {
    fn to_markdown(&self) -> String;
}

/// Renderer for structured results
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a value to a string
    pub fn render<T: Serialize + ToMarkdown>(&self, value: &T) -> String {
        match self.config.format {
            OutputFormat::Json => self.render_json(value),
            OutputFormat::Markdown => value.to_markdown(),
        }
    }

    /// Render to a writer
    pub fn render_to<T: Serialize + ToMarkdown, W: Write>(
        &self,
        value: &T,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(value);
        writer.write_all(output.as_bytes())?;
        writer.write_all(b"\n")
    }

    fn render_json<T: Serialize>(&self, value: &T) -> String {
        let rendered = if self.config.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }
}
