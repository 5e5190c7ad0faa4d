//! Loading mapping tables from their JSON documents.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Result, ThemeError};

use super::{MappingTables, TargetSlot};

pub const TOKEN_MAPPINGS_FILE: &str = "TokenMappings.json";
pub const CATEGORY_GUIDS_FILE: &str = "CategoryGuid.json";
pub const TOKEN_FALLBACK_FILE: &str = "VSCTokenFallback.json";
pub const OVERLAY_MAPPING_FILE: &str = "OverlayMapping.json";
pub const KNOWN_TARGETS_FILE: &str = "VSTokens.json";

#[derive(Deserialize)]
struct RawTokenMappings {
    #[serde(rename = "tokenColors")]
    token_colors: Vec<RawTokenMapping>,
}

#[derive(Deserialize)]
struct RawTokenMapping {
    #[serde(rename = "VSC Token")]
    source: String,
    #[serde(rename = "VS Token")]
    targets: Vec<String>,
}

/// Overlay rules are written either as `[opacity, token]` or as a
/// serialised tuple object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOverlay {
    Pair(f32, String),
    Tuple {
        #[serde(rename = "Item1")]
        opacity: f32,
        #[serde(rename = "Item2")]
        base_token: String,
    },
}

impl RawOverlay {
    fn into_parts(self) -> (f32, String) {
        match self {
            RawOverlay::Pair(opacity, token) => (opacity, token),
            RawOverlay::Tuple {
                opacity,
                base_token,
            } => (opacity, base_token),
        }
    }
}

/// The raw text of each mapping document.
#[derive(Debug, Clone, Copy)]
pub struct MappingSources<'a> {
    pub token_mappings: &'a str,
    pub category_guids: &'a str,
    pub token_fallback: &'a str,
    pub overlays: &'a str,
    pub known_targets: Option<&'a str>,
}

impl MappingTables {
    /// Load all tables from a mapping data directory.
    ///
    /// `VSTokens.json` is optional; the other four files are required.
    pub fn load(dir: &Path) -> Result<Self> {
        let token_mappings = read(dir, TOKEN_MAPPINGS_FILE)?;
        let category_guids = read(dir, CATEGORY_GUIDS_FILE)?;
        let token_fallback = read(dir, TOKEN_FALLBACK_FILE)?;
        let overlays = read(dir, OVERLAY_MAPPING_FILE)?;

        let known_path = dir.join(KNOWN_TARGETS_FILE);
        let known_targets = if known_path.exists() {
            Some(read(dir, KNOWN_TARGETS_FILE)?)
        } else {
            None
        };

        Self::from_json(MappingSources {
            token_mappings: &token_mappings,
            category_guids: &category_guids,
            token_fallback: &token_fallback,
            overlays: &overlays,
            known_targets: known_targets.as_deref(),
        })
    }

    /// Build tables from in-memory JSON documents.
    pub fn from_json(sources: MappingSources<'_>) -> Result<Self> {
        let mut builder = MappingTables::builder();

        let raw: RawTokenMappings = parse_json(sources.token_mappings, TOKEN_MAPPINGS_FILE)?;
        for entry in raw.token_colors {
            let targets = entry
                .targets
                .iter()
                .map(|t| TargetSlot::parse(t))
                .collect::<Result<Vec<_>>>()?;
            builder.add_scope(entry.source, targets)?;
        }

        let categories: HashMap<String, String> =
            parse_json(sources.category_guids, CATEGORY_GUIDS_FILE)?;
        for (name, guid) in categories {
            let id = Uuid::parse_str(guid.trim()).map_err(|e| ThemeError::Mapping {
                message: format!("Invalid GUID '{}' for category '{}': {}", guid, name, e),
                help: None,
            })?;
            builder.add_category(name, id);
        }

        let fallbacks: HashMap<String, String> =
            parse_json(sources.token_fallback, TOKEN_FALLBACK_FILE)?;
        for (token, fallback) in fallbacks {
            builder.add_fallback(token, fallback);
        }

        let overlays: HashMap<String, RawOverlay> =
            parse_json(sources.overlays, OVERLAY_MAPPING_FILE)?;
        for (token, overlay) in overlays {
            let (opacity, base_token) = overlay.into_parts();
            builder.add_overlay(token, opacity, base_token);
        }

        if let Some(text) = sources.known_targets {
            let known: Vec<String> = parse_json(text, KNOWN_TARGETS_FILE)?;
            builder.add_known_targets(known);
        }

        Ok(builder.build())
    }
}

fn read(dir: &Path, name: &str) -> Result<String> {
    let path = dir.join(name);
    fs::read_to_string(&path).map_err(|e| ThemeError::Io {
        path,
        message: format!("Failed to read mapping data: {}", e),
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(text: &str, name: &str) -> Result<T> {
    serde_json::from_str(&strip_comment_lines(text)).map_err(|e| ThemeError::Mapping {
        message: format!("Invalid {}: {}", name, e),
        help: Some("Mapping documents are JSON; whole-line // comments are allowed".to_string()),
    })
}

/// Drop lines that are entirely `//` comments.
fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}
