//! Colour type, source-string normalisation, and overlay compositing.

use std::fmt;
use std::str::FromStr;

use crate::error::{ThemeError, Result};

/// An 8-bit-per-channel colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Unpack a `0xAARRGGBB` value.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack into a `0xAARRGGBB` value.
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Parse an 8-digit `AARRGGBB` hex string (no `#`).
    pub fn from_argb_hex(s: &str) -> Result<Self> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ThemeError::Parse {
                message: format!("Invalid colour: {}", s),
                help: Some("Expected 8 hex digits in AARRGGBB order".to_string()),
            });
        }
        let argb = u32::from_str_radix(s, 16).map_err(|_| ThemeError::Parse {
            message: format!("Invalid colour: {}", s),
            help: Some("Expected 8 hex digits in AARRGGBB order".to_string()),
        })?;
        Ok(Self::from_argb(argb))
    }

    /// Parse a source theme colour (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`).
    pub fn from_source(s: &str) -> Result<Self> {
        Self::from_argb_hex(&revise(s))
    }

    /// Alpha-composite `self` over `base` into an opaque colour.
    ///
    /// `source_opacity` scales the overlay's own alpha; `display_opacity` is
    /// the opacity the host applies when it later draws the result.
    /// Channels are truncated, not rounded.
    pub fn composite_over(self, base: Colour, display_opacity: f32, source_opacity: f32) -> Colour {
        let overlay_a = self.a as f32 * source_opacity / 255.0;
        let base_a = base.a as f32 / 255.0;
        let ratio = overlay_a / display_opacity;

        let channel = |overlay: u8, under: u8| -> u8 {
            let value = ratio * overlay as f32 + (1.0 - ratio) * base_a * under as f32;
            value.clamp(0.0, 255.0) as u8
        };

        Colour::rgb(
            channel(self.r, base.r),
            channel(self.g, base.g),
            channel(self.b, base.b),
        )
    }
}

impl FromStr for Colour {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_source(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.to_argb())
    }
}

/// Normalise a source colour string to `AARRGGBB`.
///
/// Leading/trailing `#` are dropped. Lengths 3, 4, 6 and 8 are expanded or
/// rotated; anything else is returned unchanged.
pub fn revise(color: &str) -> String {
    let hex = color.trim_matches('#');
    let digits: Vec<char> = hex.chars().collect();

    match digits.as_slice() {
        [r, g, b] => format!("FF{r}{r}{g}{g}{b}{b}"),
        [r, g, b, a] => format!("{a}{a}{r}{r}{g}{g}{b}{b}"),
        [_, _, _, _, _, _] => format!("FF{hex}"),
        [_, _, _, _, _, _, _, _] => {
            // RRGGBBAA -> AARRGGBB
            let rgb: String = digits[..6].iter().collect();
            let alpha: String = digits[6..].iter().collect();
            format!("{alpha}{rgb}")
        }
        _ => hex.to_string(),
    }
}

/// Composite two source colour strings, returning `RRGGBBFF`.
///
/// The result uses source ordering (alpha last) so it can be fed back through
/// [`revise`] like any other theme colour.
pub fn compound(overlay: &str, base: &str, display_opacity: f32, source_opacity: f32) -> Result<String> {
    let overlay = Colour::from_source(overlay)?;
    let base = Colour::from_source(base)?;
    let c = overlay.composite_over(base, display_opacity, source_opacity);
    Ok(format!("{:02X}{:02X}{:02X}FF", c.r, c.g, c.b))
}
