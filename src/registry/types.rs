//! Entity types held by the colour registry.
//!
//! Entities never point back at the registry; anything that needs a theme or
//! category stores its id and resolves it through `ColorRegistry`.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::types::ColorValue;

pub const LIGHT_THEME_ID: Uuid = Uuid::from_u128(0xde3dbbcd_f642_433c_8353_8f1df4370aba);
pub const DARK_THEME_ID: Uuid = Uuid::from_u128(0x1ded0138_47ce_435e_84ef_9ec1f439b749);
pub const BLUE_THEME_ID: Uuid = Uuid::from_u128(0xa4d6a176_b948_4b29_8c66_53c97a1ed7d0);
pub const ADDITIONAL_CONTRAST_THEME_ID: Uuid =
    Uuid::from_u128(0xce94d289_8481_498b_8ca9_9b6191a315b9);
pub const HIGH_CONTRAST_THEME_ID: Uuid = Uuid::from_u128(0xa5c004b4_2d4b_494e_bf01_45fc492522c7);

/// Themes every registry starts with, in registration order.
pub const BUILT_IN_THEMES: [(Uuid, &str); 5] = [
    (LIGHT_THEME_ID, "Light"),
    (DARK_THEME_ID, "Dark"),
    (BLUE_THEME_ID, "Blue"),
    (ADDITIONAL_CONTRAST_THEME_ID, "AdditionalContrast"),
    (HIGH_CONTRAST_THEME_ID, "HighContrast"),
];

/// A named grouping of colours, identified by GUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: Uuid,
    name: String,
}

impl Category {
    pub(super) fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A colour slot name, scoped to its category.
///
/// Two names are equal only when both the category and the name match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorName {
    pub category: Uuid,
    pub name: String,
}

impl ColorName {
    pub fn new(category: Uuid, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category.braced(), self.name)
    }
}

/// The value of one colour name in one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorEntry {
    name: ColorName,
    theme: Uuid,
    pub is_empty: bool,
    pub background: ColorValue,
    pub foreground: ColorValue,
}

impl ColorEntry {
    pub(super) fn new(theme: Uuid, name: ColorName) -> Self {
        Self {
            name,
            theme,
            is_empty: false,
            background: ColorValue::INVALID,
            foreground: ColorValue::INVALID,
        }
    }

    pub fn name(&self) -> &ColorName {
        &self.name
    }

    pub fn theme_id(&self) -> Uuid {
        self.theme
    }
}

/// A colour theme and the entries it owns.
#[derive(Debug, Clone)]
pub struct Theme {
    id: Uuid,
    pub name: String,
    pub fallback_id: Option<Uuid>,
    built_in: bool,
    colors: Vec<ColorEntry>,
    index: HashMap<ColorName, usize>,
}

impl Theme {
    pub(super) fn new(id: Uuid) -> Self {
        Self {
            id,
            name: String::new(),
            fallback_id: None,
            built_in: false,
            colors: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(super) fn mark_built_in(&mut self) {
        self.built_in = true;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_built_in(&self) -> bool {
        self.built_in
    }

    /// Entries in insertion order.
    pub fn colors(&self) -> &[ColorEntry] {
        &self.colors
    }

    pub fn entry(&self, name: &ColorName) -> Option<&ColorEntry> {
        self.index.get(name).map(|&i| &self.colors[i])
    }

    /// Return the entry for `name`, inserting an empty one if needed.
    /// The flag is true when the entry was created by this call.
    pub(super) fn get_or_insert_entry(&mut self, name: &ColorName) -> (&mut ColorEntry, bool) {
        if let Some(&i) = self.index.get(name) {
            return (&mut self.colors[i], false);
        }

        let i = self.colors.len();
        self.colors.push(ColorEntry::new(self.id, name.clone()));
        self.index.insert(name.clone(), i);
        (&mut self.colors[i], true)
    }
}

/// A colour name shared by every theme, used for cross-theme iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRow {
    name: ColorName,
}

impl ColorRow {
    pub(super) fn new(name: ColorName) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &ColorName {
        &self.name
    }
}
