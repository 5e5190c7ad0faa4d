//! Finds theme JSON files in a directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Check whether a path names a theme JSON file.
pub fn is_theme_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Top-level `*.json` files in `root`, sorted by path.
///
/// Subdirectories are not searched. A missing directory yields nothing.
pub fn scan_themes(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    let mut themes: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_theme_file(p))
        .collect();

    themes.sort();
    themes
}
