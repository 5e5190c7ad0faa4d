//! Project manifest (themeconv.yaml) parsing.
//!
//! Every field is optional; command-line flags override what is set here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::encode::OutputTarget;
use crate::error::{Result, ThemeError};

/// Project manifest loaded from themeconv.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Directory holding the mapping JSON documents.
    #[serde(default = "default_mappings")]
    pub mappings: PathBuf,

    /// Output directory. Defaults to the input's directory.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Output format.
    #[serde(default)]
    pub format: OutputTarget,
}

fn default_mappings() -> PathBuf {
    PathBuf::from("data")
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            mappings: default_mappings(),
            output: None,
            format: OutputTarget::default(),
        }
    }
}

impl Manifest {
    /// Load manifest from a themeconv.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ThemeError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ThemeError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check themeconv.yaml syntax".to_string()),
        })
    }

    /// Mapping directory, relative paths taken from `root`.
    pub fn mappings_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.mappings)
    }

    /// Output directory, relative paths taken from `root`; `root` itself
    /// when unset.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        match &self.output {
            Some(dir) => root.join(dir),
            None => root.to_path_buf(),
        }
    }
}
