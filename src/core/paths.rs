//! Path normalization utilities
//!
//! Relative paths in every output use '/' as separator and are relative to the
//! repository root.

use std::path::Path;

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Number of components in a root-relative path ("" has depth 0)
pub fn relative_depth(relative: &str) -> usize {
    relative.split('/').filter(|part| !part.is_empty()).count()
}

/// Extension of a path without the leading dot, or "" when there is none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}
