//! Repository tree walking
//!
//! Uses the ignore crate's walker with its gitignore/hidden filters switched
//! off: exclusion is decided only by the fixed rules in `core::rules`, so the
//! Surveyor and the Selector see exactly the same tree.

use ignore::{DirEntry, Walk, WalkBuilder};
use std::path::Path;

use crate::core::rules::is_excluded_name;

/// Whether a walk entry is pruned (the root itself never is)
fn is_excluded_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(is_excluded_name)
        .unwrap_or(false)
}

/// Build a sorted, rule-filtered walker rooted at `root`
///
/// Excluded directories are pruned, never descended into. Symlinks are not
/// followed. Entries come out in file-name order for reproducible results.
pub fn repository_walker(root: &Path, max_depth: Option<usize>) -> Walk {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .max_depth(max_depth)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| !is_excluded_entry(entry));

    builder.build()
}
