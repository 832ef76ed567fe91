//! In-memory model for one extraction run
//!
//! Nothing here outlives a single invocation: candidates are built during the
//! walk, ranked, selected and then dropped once the output string exists.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::rules::{DEFAULT_MAX_FILES, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_TOTAL_BYTES};

/// A file eligible for inclusion after exclusion filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Absolute (or root-joined) path on disk
    pub path: PathBuf,

    /// Path relative to the repository root, using '/' as separator
    pub relative: String,

    /// Raw size in bytes as reported by the filesystem
    pub size: u64,

    /// Extension without the leading dot (empty when absent)
    pub extension: String,
}

impl FileCandidate {
    /// Final path component
    pub fn file_name(&self) -> &str {
        self.relative
            .rsplit('/')
            .next()
            .unwrap_or(self.relative.as_str())
    }
}

/// Sort key for candidates; lower sorts first
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PriorityKey {
    /// Priority class, 0 is most important
    pub tier: u8,

    /// Byte size, or 0 for the top three tiers
    pub size: u64,

    /// Lowercased file name
    pub name: String,
}

/// Bounded-depth listing of a tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSummary {
    pub root: String,
    pub files: Vec<String>,
    pub directories: Vec<String>,
}

impl StructureSummary {
    pub fn empty(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
            directories: Vec::new(),
        }
    }
}

/// Size limits for one extraction call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Maximum number of included files
    pub max_files: usize,

    /// Ceiling on the combined size of included files
    pub max_total_bytes: u64,

    /// Files larger than this are never candidates
    pub max_file_bytes: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Outcome of budgeted selection
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub files: Vec<FileCandidate>,
    pub total_bytes: u64,
}

/// Assembled repository content and its bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentReport {
    /// The Markdown document handed to the prompt builder
    pub text: String,

    /// Relative paths of included files, in inclusion order
    pub included: Vec<String>,

    /// Sum of the raw sizes of included files
    pub total_bytes: u64,
}
