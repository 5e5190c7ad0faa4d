//! Text encoders for a populated registry.
//!
//! The output format is a tagged choice between XML and pkgdef; saving to a
//! path picks the variant from the file extension.

mod pkgdef;
mod xml;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};
use crate::registry::ColorRegistry;

pub use pkgdef::{render_pkgdef, theme_section, PkgdefItem, PkgdefValue, PkgdefWriter, DATA_VALUE_NAME};
pub use xml::render_xml;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    #[default]
    Pkgdef,
    Xml,
}

impl OutputTarget {
    /// Pick a target from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        if ext.eq_ignore_ascii_case("xml") {
            Ok(OutputTarget::Xml)
        } else if ext.eq_ignore_ascii_case("pkgdef") {
            Ok(OutputTarget::Pkgdef)
        } else {
            let shown = if ext.is_empty() { String::new() } else { format!(".{}", ext) };
            Err(ThemeError::Encode {
                message: format!(
                    "Invalid file extension '{}'. Only XML files and PKGDEF files are allowed.",
                    shown
                ),
                help: Some("Use a .xml or .pkgdef output path".to_string()),
            })
        }
    }

    /// File extension written for this target.
    pub fn extension(self) -> &'static str {
        match self {
            OutputTarget::Pkgdef => "pkgdef",
            OutputTarget::Xml => "xml",
        }
    }

    pub fn render(self, registry: &ColorRegistry) -> Result<String> {
        match self {
            OutputTarget::Pkgdef => render_pkgdef(registry),
            OutputTarget::Xml => render_xml(registry),
        }
    }
}

impl FromStr for OutputTarget {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pkgdef" => Ok(OutputTarget::Pkgdef),
            "xml" => Ok(OutputTarget::Xml),
            other => Err(ThemeError::Parse {
                message: format!("Unknown output format '{}'", other),
                help: Some("Expected 'pkgdef' or 'xml'".to_string()),
            }),
        }
    }
}

/// Render `registry` in the format implied by `path` and write it there,
/// creating parent directories as needed.
pub fn save_registry(registry: &ColorRegistry, path: &Path) -> Result<()> {
    let target = OutputTarget::from_path(path)?;
    let text = target.render(registry)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ThemeError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    fs::write(path, text).map_err(|e| ThemeError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write output: {}", e),
    })
}
