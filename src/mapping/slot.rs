//! Target slot syntax: `category&key[&aspect][&opacity&backgroundToken]`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ThemeError};

/// Which half of a target colour a slot writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    Foreground,
    Background,
}

impl Aspect {
    /// Anything other than "background" (any case) is a foreground.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("background") {
            Aspect::Background
        } else {
            Aspect::Foreground
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aspect::Foreground => write!(f, "Foreground"),
            Aspect::Background => write!(f, "Background"),
        }
    }
}

/// One destination colour a source token feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSlot {
    pub category: String,
    pub key_name: String,
    pub aspect: Aspect,
    /// Opacity the source editor applies to this token when drawn.
    pub foreground_opacity: Option<f32>,
    /// Source token naming the colour drawn underneath.
    pub overlay_background: Option<String>,
}

impl TargetSlot {
    pub fn new(category: impl Into<String>, key_name: impl Into<String>, aspect: Aspect) -> Self {
        Self {
            category: category.into(),
            key_name: key_name.into(),
            aspect,
            foreground_opacity: None,
            overlay_background: None,
        }
    }

    /// Attach a per-slot overlay: the resolved foreground is composited at
    /// `opacity` over the colour named by `background`.
    pub fn with_overlay(mut self, opacity: f32, background: impl Into<String>) -> Self {
        self.foreground_opacity = Some(opacity);
        self.overlay_background = Some(background.into());
        self
    }

    pub fn is_background(&self) -> bool {
        self.aspect == Aspect::Background
    }

    /// The `(category, key, aspect)` identity used for duplicate detection.
    pub fn target_key(&self) -> String {
        format!("{}&{}&{}", self.category, self.key_name, self.aspect)
    }

    /// Parse a target string from the scope mapping table.
    pub fn parse(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split('&').collect();

        let slot = match fields.as_slice() {
            [category, key] => Self::new(*category, *key, Aspect::Foreground),
            [category, key, aspect] => Self::new(*category, *key, Aspect::from_name(aspect)),
            [category, key, opacity, background] => {
                Self::new(*category, *key, Aspect::Foreground)
                    .with_overlay(parse_opacity(opacity, s)?, *background)
            }
            [category, key, aspect, opacity, background] => {
                Self::new(*category, *key, Aspect::from_name(aspect))
                    .with_overlay(parse_opacity(opacity, s)?, *background)
            }
            _ => {
                return Err(ThemeError::Mapping {
                    message: format!("Invalid mapping format: {}", s),
                    help: Some(
                        "Use category&key[&aspect] or category&key[&aspect]&opacity&token"
                            .to_string(),
                    ),
                })
            }
        };

        Ok(slot)
    }
}

impl FromStr for TargetSlot {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target_key())
    }
}

fn parse_opacity(value: &str, source: &str) -> Result<f32> {
    value.trim().parse::<f32>().map_err(|_| ThemeError::Mapping {
        message: format!("Invalid opacity '{}' in mapping {}", value, source),
        help: None,
    })
}
