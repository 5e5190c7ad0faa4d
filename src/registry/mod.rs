//! Colour registry holding themes, categories, and per-theme colour entries.
//!
//! The registry is built once per conversion, filled by the resolver or the
//! XML reader, and then handed to exactly one encoder.
//!
//! # Example
//!
//! ```ignore
//! use themeconv::registry::{ColorName, ColorRegistry};
//!
//! let mut registry = ColorRegistry::new();
//! let category = registry.register_category(category_id, "Environment").id();
//! let entry = registry.get_or_create_entry(theme_id, ColorName::new(category, "ToolWindowText"));
//! entry.foreground = ColorValue::raw(0xFF0000FF);
//! ```

pub mod types;

use std::collections::HashMap;

use uuid::Uuid;

pub use types::{
    Category, ColorEntry, ColorName, ColorRow, Theme, ADDITIONAL_CONTRAST_THEME_ID,
    BLUE_THEME_ID, BUILT_IN_THEMES, DARK_THEME_ID, HIGH_CONTRAST_THEME_ID, LIGHT_THEME_ID,
};

/// In-memory store of themes, categories, and colour rows.
///
/// Every collection has a reverse index; the insert/remove methods here are
/// the only way either side changes, so the two never disagree.
#[derive(Debug, Clone)]
pub struct ColorRegistry {
    themes: Vec<Theme>,
    theme_index: HashMap<Uuid, usize>,
    categories: Vec<Category>,
    category_index: HashMap<Uuid, usize>,
    rows: Vec<ColorRow>,
    row_index: HashMap<ColorName, usize>,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorRegistry {
    /// Create a registry pre-seeded with the built-in themes.
    pub fn new() -> Self {
        let mut registry = Self {
            themes: Vec::new(),
            theme_index: HashMap::new(),
            categories: Vec::new(),
            category_index: HashMap::new(),
            rows: Vec::new(),
            row_index: HashMap::new(),
        };

        for (id, name) in BUILT_IN_THEMES {
            let theme = registry.get_or_create_theme(id);
            theme.mark_built_in();
            if theme.name.is_empty() {
                theme.name = name.to_string();
            }
        }

        registry
    }

    /// Get a theme, creating it with an empty name if absent.
    pub fn get_or_create_theme(&mut self, id: Uuid) -> &mut Theme {
        let i = match self.theme_index.get(&id) {
            Some(&i) => i,
            None => self.insert_theme(Theme::new(id)),
        };
        &mut self.themes[i]
    }

    /// Register a category. The first registration of an id wins.
    pub fn register_category(&mut self, id: Uuid, name: &str) -> &Category {
        let i = match self.category_index.get(&id) {
            Some(&i) => i,
            None => {
                let i = self.categories.len();
                self.categories.push(Category::new(id, name));
                self.category_index.insert(id, i);
                i
            }
        };
        &self.categories[i]
    }

    /// Get the entry for `name` in a theme, creating the theme, the entry and
    /// the shared colour row as needed.
    pub fn get_or_create_entry(&mut self, theme_id: Uuid, name: ColorName) -> &mut ColorEntry {
        if !self.row_index.contains_key(&name) {
            self.row_index.insert(name.clone(), self.rows.len());
            self.rows.push(ColorRow::new(name.clone()));
        }

        let theme = self.get_or_create_theme(theme_id);
        let (entry, _) = theme.get_or_insert_entry(&name);
        entry
    }

    /// Remove a user theme. Built-in themes cannot be removed.
    pub fn remove_theme(&mut self, id: Uuid) -> Option<Theme> {
        let i = *self.theme_index.get(&id)?;
        if self.themes[i].is_built_in() {
            return None;
        }

        let theme = self.themes.remove(i);
        self.theme_index.remove(&id);
        for slot in self.theme_index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(theme)
    }

    fn insert_theme(&mut self, theme: Theme) -> usize {
        let i = self.themes.len();
        self.theme_index.insert(theme.id(), i);
        self.themes.push(theme);
        i
    }

    /// All themes, built-ins first, in registration order.
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn theme(&self, id: Uuid) -> Option<&Theme> {
        self.theme_index.get(&id).map(|&i| &self.themes[i])
    }

    pub fn theme_mut(&mut self, id: Uuid) -> Option<&mut Theme> {
        match self.theme_index.get(&id) {
            Some(&i) => Some(&mut self.themes[i]),
            None => None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.category_index.get(&id).map(|&i| &self.categories[i])
    }

    /// Colour rows in first-seen order.
    pub fn rows(&self) -> &[ColorRow] {
        &self.rows
    }

    /// Colour rows belonging to one category.
    pub fn rows_in_category(&self, category: Uuid) -> impl Iterator<Item = &ColorRow> {
        self.rows
            .iter()
            .filter(move |row| row.name().category == category)
    }

    pub fn entry(&self, theme_id: Uuid, name: &ColorName) -> Option<&ColorEntry> {
        self.theme(theme_id)?.entry(name)
    }

    /// Number of themes that are not built in.
    pub fn user_theme_count(&self) -> usize {
        self.themes.iter().filter(|t| !t.is_built_in()).count()
    }
}
