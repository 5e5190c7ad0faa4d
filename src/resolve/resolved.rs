//! Output of the resolver: category -> key -> colours.

use std::collections::BTreeMap;

/// Resolved colours for one target key, in source string form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotColors {
    pub foreground: Option<String>,
    pub background: Option<String>,
}

impl SlotColors {
    pub fn new(foreground: Option<String>, background: Option<String>) -> Self {
        Self {
            foreground,
            background,
        }
    }

    /// True when neither aspect has a value.
    pub fn is_empty(&self) -> bool {
        self.foreground.is_none() && self.background.is_none()
    }
}

/// Resolved colours grouped by category name, then key name.
///
/// Both levels are ordered by name so encoders see a deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTheme {
    categories: BTreeMap<String, BTreeMap<String, SlotColors>>,
}

impl ResolvedTheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the colours for a key, replacing whatever was there.
    pub fn insert(&mut self, category: impl Into<String>, key: impl Into<String>, colors: SlotColors) {
        self.categories
            .entry(category.into())
            .or_default()
            .insert(key.into(), colors);
    }

    pub fn get(&self, category: &str, key: &str) -> Option<&SlotColors> {
        self.categories.get(category)?.get(key)
    }

    pub fn category(&self, name: &str) -> Option<&BTreeMap<String, SlotColors>> {
        self.categories.get(name)
    }

    /// Categories in name order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, SlotColors>)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys with at least one colour.
    pub fn slot_count(&self) -> usize {
        self.categories
            .values()
            .flat_map(|keys| keys.values())
            .filter(|colors| !colors.is_empty())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_count() == 0
    }
}
