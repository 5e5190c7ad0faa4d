//! Target colour types and per-aspect colour values.

use std::fmt;

/// How a target colour's source value is interpreted by the host.
///
/// Byte values match the host's colour-type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ColorType {
    #[default]
    Invalid = 0,
    Raw = 1,
    ColorIndex = 2,
    SysColor = 3,
    Automatic = 5,
}

impl ColorType {
    /// Decode a type byte; unrecognised bytes become `Invalid`.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => ColorType::Raw,
            2 => ColorType::ColorIndex,
            3 => ColorType::SysColor,
            5 => ColorType::Automatic,
            _ => ColorType::Invalid,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Name used in XML theme documents.
    pub fn name(self) -> &'static str {
        match self {
            ColorType::Invalid => "CT_INVALID",
            ColorType::Raw => "CT_RAW",
            ColorType::ColorIndex => "CT_COLORINDEX",
            ColorType::SysColor => "CT_SYSCOLOR",
            ColorType::Automatic => "CT_AUTOMATIC",
        }
    }

    /// Look up a type by its XML name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CT_INVALID" => Some(ColorType::Invalid),
            "CT_RAW" => Some(ColorType::Raw),
            "CT_COLORINDEX" => Some(ColorType::ColorIndex),
            "CT_SYSCOLOR" => Some(ColorType::SysColor),
            "CT_AUTOMATIC" => Some(ColorType::Automatic),
            _ => None,
        }
    }

    /// Whether a source value accompanies this type on the wire.
    pub fn carries_value(self) -> bool {
        self != ColorType::Invalid
    }
}

impl fmt::Display for ColorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One aspect (background or foreground) of a colour entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorValue {
    kind: ColorType,
    source: u32,
}

impl ColorValue {
    pub const INVALID: Self = Self {
        kind: ColorType::Invalid,
        source: 0,
    };

    /// Create a value. An invalid type never keeps a source.
    pub fn new(kind: ColorType, source: u32) -> Self {
        if kind.carries_value() {
            Self { kind, source }
        } else {
            Self::INVALID
        }
    }

    /// A raw colour, stored in host (`AABBGGRR`) byte order.
    pub fn raw(source: u32) -> Self {
        Self::new(ColorType::Raw, source)
    }

    pub fn kind(&self) -> ColorType {
        self.kind
    }

    pub fn source(&self) -> u32 {
        self.source
    }

    pub fn is_valid(&self) -> bool {
        self.kind.carries_value()
    }
}

/// Swap the red and blue byte lanes of a raw colour.
///
/// `AARRGGBB` <-> `AABBGGRR`. Non-raw values are returned unchanged.
pub fn swap_argb_abgr(value: u32, kind: ColorType) -> u32 {
    if kind != ColorType::Raw {
        return value;
    }
    let alpha = value & 0xFF00_FF00;
    let red = (value >> 16) & 0xFF;
    let blue = value & 0xFF;
    alpha | blue << 16 | red
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_byte_normalises_unknown() {
        assert_eq!(ColorType::from_byte(1), ColorType::Raw);
        assert_eq!(ColorType::from_byte(5), ColorType::Automatic);
        assert_eq!(ColorType::from_byte(4), ColorType::Invalid);
        assert_eq!(ColorType::from_byte(0xFF), ColorType::Invalid);
    }

    #[test]
    fn test_names_round_trip() {
        for kind in [
            ColorType::Invalid,
            ColorType::Raw,
            ColorType::ColorIndex,
            ColorType::SysColor,
            ColorType::Automatic,
        ] {
            assert_eq!(ColorType::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ColorType::from_name("CT_VSCOLOR"), None);
    }

    #[test]
    fn test_invalid_value_drops_source() {
        let v = ColorValue::new(ColorType::Invalid, 0x1234);
        assert_eq!(v.source(), 0);
        assert!(!v.is_valid());
    }

    #[test]
    fn test_swap_raw() {
        assert_eq!(swap_argb_abgr(0xFF11_2233, ColorType::Raw), 0xFF33_2211);
    }

    #[test]
    fn test_swap_ignores_other_types() {
        assert_eq!(swap_argb_abgr(0xFF11_2233, ColorType::SysColor), 0xFF11_2233);
    }

    #[test]
    fn test_swap_is_an_involution() {
        for x in [0u32, 1, 0xFF00_00FF, 0x1234_5678, 0xDEAD_BEEF, u32::MAX] {
            assert_eq!(swap_argb_abgr(swap_argb_abgr(x, ColorType::Raw), ColorType::Raw), x);
        }
    }
}
