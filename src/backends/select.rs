//! Content selection - candidate filtering, priority ranking and budgeting

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::backends::walk::repository_walker;
use crate::core::model::{ExtractOptions, FileCandidate, PriorityKey, Selection};
use crate::core::paths::{extension_of, make_relative};
use crate::core::rules::{
    is_code_extension, CONFIG_EXTENSIONS, DOC_EXTENSIONS, ENTRY_POINT_NAMES, MANIFEST_NAMES,
    SOURCE_PATH_MARKERS, TEST_PATH_MARKERS,
};

/// Walk the whole tree and keep every file eligible for inclusion
///
/// A file is eligible when no component of its path is excluded, its
/// extension is recognized and its raw size is at most `max_file_bytes`.
pub fn collect_candidates(root: &Path, max_file_bytes: u64) -> Vec<FileCandidate> {
    let mut candidates = Vec::new();

    for entry in repository_walker(root, None) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry during selection");
                continue;
            }
        };

        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(true) {
            continue;
        }

        let path = entry.path();
        let extension = extension_of(path);
        if !is_code_extension(&extension) {
            continue;
        }

        // Links are resolved here; the walker itself never descends through them
        let size = match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata.len(),
            Ok(_) => continue,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot stat file");
                continue;
            }
        };
        if size > max_file_bytes {
            debug!(path = %path.display(), size, "file exceeds per-file cap");
            continue;
        }

        let relative = match make_relative(path, root) {
            Some(r) => r,
            None => continue,
        };

        candidates.push(FileCandidate {
            path: path.to_path_buf(),
            relative,
            size,
            extension,
        });
    }

    candidates
}

/// Derive the sort key of a candidate; the first matching tier wins
pub fn priority_key(candidate: &FileCandidate) -> PriorityKey {
    let name = candidate.file_name().to_lowercase();
    let path = candidate.relative.to_lowercase();
    let extension = candidate.extension.as_str();

    let tier = if name.contains("readme") {
        0
    } else if MANIFEST_NAMES.contains(&name.as_str()) {
        1
    } else if ENTRY_POINT_NAMES.contains(&name.as_str()) {
        2
    } else if SOURCE_PATH_MARKERS.iter().any(|m| path.contains(m)) {
        3
    } else if DOC_EXTENSIONS.contains(&extension) {
        4
    } else if CONFIG_EXTENSIONS.contains(&extension) {
        5
    } else if TEST_PATH_MARKERS.iter().any(|m| path.contains(m)) {
        6
    } else {
        7
    };

    // Size only breaks ties below the top three tiers
    let size = if tier <= 2 { 0 } else { candidate.size };

    PriorityKey { tier, size, name }
}

/// Sort candidates into inclusion order
pub fn rank_candidates(candidates: Vec<FileCandidate>) -> Vec<FileCandidate> {
    let mut keyed: Vec<(PriorityKey, FileCandidate)> = candidates
        .into_iter()
        .map(|c| (priority_key(&c), c))
        .collect();

    keyed.sort_by(|(ka, a), (kb, b)| ka.cmp(kb).then_with(|| a.relative.cmp(&b.relative)));

    keyed.into_iter().map(|(_, c)| c).collect()
}

/// Greedy skip-and-continue packing under the file count and byte budget
///
/// A candidate that would overflow the budget is passed over, and later
/// (smaller) candidates are still considered.
pub fn select_within_budget(ranked: Vec<FileCandidate>, opts: &ExtractOptions) -> Selection {
    let mut selection = Selection::default();

    for candidate in ranked {
        if selection.files.len() >= opts.max_files {
            break;
        }
        if selection.total_bytes + candidate.size > opts.max_total_bytes {
            debug!(path = %candidate.relative, size = candidate.size, "skipped over budget");
            continue;
        }
        selection.total_bytes += candidate.size;
        selection.files.push(candidate);
    }

    selection
}

/// Collect, rank and select in one step
pub fn select_files(root: &Path, opts: &ExtractOptions) -> Selection {
    let candidates = collect_candidates(root, opts.max_file_bytes);
    debug!(count = candidates.len(), "collected candidates");
    select_within_budget(rank_candidates(candidates), opts)
}
