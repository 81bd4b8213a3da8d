//! Recursive enumeration of the regular files under a template root.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::InterpolateError;

/// List every regular file under `root`, depth-first.
///
/// Each entry is re-stated with `symlink_metadata` after the walk reports it,
/// and kept only if it is still a regular file at that moment. Directories and
/// symlinks are never returned. The list is fully materialized; the first
/// traversal or stat error aborts the whole enumeration.
///
/// Ordering follows the filesystem walk and is not stable across platforms.
pub fn enumerate(root: &Path) -> Result<Vec<PathBuf>, InterpolateError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|source| InterpolateError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        let metadata = std::fs::symlink_metadata(path).map_err(|source| InterpolateError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        if metadata.file_type().is_file() {
            files.push(path.to_path_buf());
        }
    }

    tracing::debug!(root = %root.display(), files = files.len(), "Enumerated template tree");
    Ok(files)
}
