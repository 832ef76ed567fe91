//! Flows module - Operations combining several backends
//!
//! Provides:
//! - content: Assemble the repository content document
//! - prompt: Build a documentation prompt for a local or remote repository
//! - toc: Table of contents for a generated Markdown document

pub mod content;
pub mod prompt;
pub mod toc;
