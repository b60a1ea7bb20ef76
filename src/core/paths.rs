//! Path normalization utilities
//!
//! Ensures all paths are normalized to use '/' as separator.

use std::path::{Path, PathBuf};

/// Default cache root, relative to the working directory
pub const DEFAULT_CACHE_ROOT: &str = "static";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Directory of a generation under the cache root
pub fn generation_dir(root: &Path, id: &str) -> PathBuf {
    root.join(id)
}
