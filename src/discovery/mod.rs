//! Input discovery for conversions.
//!
//! Works out which theme files to convert and which manifest applies.
//! A directory input is scanned for top-level `*.json` files; a file input
//! is converted on its own. In both cases `themeconv.yaml` is looked up
//! next to the input unless a manifest path is given.
//!
//! # Example
//!
//! ```ignore
//! use themeconv::discovery::discover;
//!
//! let result = discover(Path::new("./themes"), None)?;
//! println!("Found {} themes", result.themes.len());
//! ```

mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::{Result, ThemeError};

pub use manifest::Manifest;
pub use scanner::{is_theme_file, scan_themes};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "themeconv.yaml";

/// Result of discovering themes for a conversion.
#[derive(Debug)]
pub struct DiscoveryResult {
    /// Directory that relative manifest paths resolve against.
    pub root: PathBuf,

    /// The loaded manifest (default if none was found).
    pub manifest: Manifest,

    /// Whether a manifest file was found.
    pub has_manifest: bool,

    /// Theme files to convert, in order.
    pub themes: Vec<PathBuf>,
}

impl DiscoveryResult {
    pub fn mappings_dir(&self) -> PathBuf {
        self.manifest.mappings_dir(&self.root)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.manifest.output_dir(&self.root)
    }
}

/// Discover themes from a file or directory.
pub fn discover(input: &Path, manifest_path: Option<&Path>) -> Result<DiscoveryResult> {
    let (root, themes) = if input.is_dir() {
        (input.to_path_buf(), scan_themes(input))
    } else if input.is_file() {
        let root = input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        (root, vec![input.to_path_buf()])
    } else {
        return Err(ThemeError::Io {
            path: input.to_path_buf(),
            message: "Input does not exist".to_string(),
        });
    };

    let manifest_path = manifest_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(MANIFEST_FILENAME));
    let (manifest, has_manifest) = if manifest_path.exists() {
        (Manifest::load(&manifest_path)?, true)
    } else {
        (Manifest::default(), false)
    };

    Ok(DiscoveryResult {
        root,
        manifest,
        has_manifest,
        themes,
    })
}
