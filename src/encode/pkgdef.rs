//! Pkgdef text output.
//!
//! ```text
//! [$RootKey$\Themes\{theme-guid}]
//! @="My Theme"
//! "Name"="My Theme"
//! "FallbackId"="{1ded0138-47ce-435e-84ef-9ec1f439b749}"
//!
//! [$RootKey$\Themes\{theme-guid}\Environment]
//! "Data"=hex:38,00,00,00,0b,00,...
//! ```

use std::collections::HashMap;

use uuid::Uuid;

use crate::codec::encode_category_blob;
use crate::error::{Result, ThemeError};
use crate::registry::{ColorEntry, ColorRegistry};

/// Value name holding a category's binary blob.
pub const DATA_VALUE_NAME: &str = "Data";

const ROOT_KEY: &str = "$RootKey$\\Themes";

/// A typed pkgdef value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PkgdefValue {
    String(String),
    Binary(Vec<u8>),
}

/// One line-to-be in a pkgdef file. Items with no value name only open
/// their section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkgdefItem {
    pub section: String,
    pub name: Option<String>,
    pub value: PkgdefValue,
}

impl PkgdefItem {
    pub fn section(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            name: None,
            value: PkgdefValue::String(String::new()),
        }
    }

    pub fn string(section: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            name: Some(name.into()),
            value: PkgdefValue::String(value.into()),
        }
    }

    pub fn binary(section: impl Into<String>, name: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            section: section.into(),
            name: Some(name.into()),
            value: PkgdefValue::Binary(value),
        }
    }
}

/// Section-aware pkgdef text writer.
#[derive(Debug, Default)]
pub struct PkgdefWriter {
    out: String,
    last_section: Option<String>,
}

impl PkgdefWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, opening a new section when it differs from the last.
    pub fn write(&mut self, item: &PkgdefItem) {
        if item.section.is_empty() {
            return;
        }

        if self.last_section.as_deref() != Some(item.section.as_str()) {
            if self.last_section.is_some() {
                self.out.push('\n');
            }
            self.out.push_str(&format!("[{}]\n", item.section));
            self.last_section = Some(item.section.clone());
        }

        let Some(name) = item.name.as_deref().filter(|n| !n.is_empty()) else {
            return;
        };

        if name == "@" {
            self.out.push('@');
        } else {
            self.out.push_str(&format!("\"{}\"", name));
        }
        self.out.push('=');

        match &item.value {
            PkgdefValue::String(s) => {
                self.out.push_str(&format!("\"{}\"", s));
            }
            PkgdefValue::Binary(bytes) => {
                self.out.push_str("hex:");
                self.out.push_str(&hex_list(bytes));
            }
        }
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// `$RootKey$\Themes\{guid}`
pub fn theme_section(theme: Uuid) -> String {
    format!("{}\\{}", ROOT_KEY, theme.braced())
}

/// Render a registry: theme registrations, then one `Data` blob per
/// (theme, category) group that has a non-empty entry.
pub fn render_pkgdef(registry: &ColorRegistry) -> Result<String> {
    let mut writer = PkgdefWriter::new();

    for theme in registry.themes().iter().filter(|t| !t.is_built_in()) {
        let section = theme_section(theme.id());
        writer.write(&PkgdefItem::string(&section, "@", &theme.name));
        writer.write(&PkgdefItem::string(&section, "Name", &theme.name));
        if let Some(fallback) = theme.fallback_id {
            writer.write(&PkgdefItem::string(
                &section,
                "FallbackId",
                fallback.braced().to_string(),
            ));
        }
    }

    for ((theme_id, category_id), entries) in group_entries(registry) {
        if entries.iter().all(|e| e.is_empty) {
            continue;
        }

        let category = registry.category(category_id).ok_or_else(|| ThemeError::Encode {
            message: format!("Colours refer to unregistered category {}", category_id.braced()),
            help: None,
        })?;

        let section = format!("{}\\{}", theme_section(theme_id), category.name());
        writer.write(&PkgdefItem::section(&section));
        writer.write(&PkgdefItem::binary(
            &section,
            DATA_VALUE_NAME,
            encode_category_blob(category_id, entries)?,
        ));
    }

    Ok(writer.finish())
}

/// Entries grouped by (theme, category) in first-seen order.
fn group_entries(registry: &ColorRegistry) -> Vec<((Uuid, Uuid), Vec<&ColorEntry>)> {
    let mut groups: Vec<((Uuid, Uuid), Vec<&ColorEntry>)> = Vec::new();
    let mut index: HashMap<(Uuid, Uuid), usize> = HashMap::new();

    for theme in registry.themes() {
        for entry in theme.colors() {
            let key = (theme.id(), entry.name().category);
            let i = *index.entry(key).or_insert_with(|| {
                groups.push((key, Vec::new()));
                groups.len() - 1
            });
            groups[i].1.push(entry);
        }
    }

    groups
}

fn hex_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ColorName, DARK_THEME_ID};
    use crate::types::ColorValue;

    fn env_id() -> Uuid {
        Uuid::from_u128(0x624ed9c3_bdfd_41fa_96c3_7c824ea32e3d)
    }

    fn sample_registry() -> (ColorRegistry, Uuid) {
        let theme_id = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0042);
        let mut registry = ColorRegistry::new();
        let theme = registry.get_or_create_theme(theme_id);
        theme.name = "Sample".to_string();
        theme.fallback_id = Some(DARK_THEME_ID);
        registry.register_category(env_id(), "Environment");
        registry
            .get_or_create_entry(theme_id, ColorName::new(env_id(), "ToolWindowText"))
            .foreground = ColorValue::raw(0xFF00_00FF);
        (registry, theme_id)
    }

    #[test]
    fn test_render_pkgdef_snapshot() {
        let (registry, _) = sample_registry();
        let text = render_pkgdef(&registry).unwrap();

        insta::assert_snapshot!(text, @r###"
[$RootKey$\Themes\{00000000-0000-0000-0000-000000000042}]
@="Sample"
"Name"="Sample"
"FallbackId"="{1ded0138-47ce-435e-84ef-9ec1f439b749}"

[$RootKey$\Themes\{00000000-0000-0000-0000-000000000042}\Environment]
"Data"=hex:38,00,00,00,0b,00,00,00,01,00,00,00,c3,d9,4e,62,fd,bd,fa,41,96,c3,7c,82,4e,a3,2e,3d,01,00,00,00,0e,00,00,00,54,6f,6f,6c,57,69,6e,64,6f,77,54,65,78,74,00,01,ff,00,00,ff
"###);
    }

    #[test]
    fn test_empty_theme_writes_registration_only() {
        let theme_id = Uuid::from_u128(9);
        let mut registry = ColorRegistry::new();
        registry.get_or_create_theme(theme_id).name = "Empty".to_string();

        let text = render_pkgdef(&registry).unwrap();
        assert_eq!(
            text,
            "[$RootKey$\\Themes\\{00000000-0000-0000-0000-000000000009}]\n@=\"Empty\"\n\"Name\"=\"Empty\"\n"
        );
        assert!(!text.contains("Data"));
    }

    #[test]
    fn test_groups_of_only_empty_entries_are_skipped() {
        let (mut registry, theme_id) = sample_registry();
        registry
            .get_or_create_entry(theme_id, ColorName::new(env_id(), "ToolWindowText"))
            .is_empty = true;

        let text = render_pkgdef(&registry).unwrap();
        assert!(!text.contains("\"Data\""));
    }

    #[test]
    fn test_writer_separates_sections() {
        let mut writer = PkgdefWriter::new();
        writer.write(&PkgdefItem::string("A", "x", "1"));
        writer.write(&PkgdefItem::string("A", "y", "2"));
        writer.write(&PkgdefItem::binary("B", "Data", vec![0x0A, 0xFF]));
        writer.write(&PkgdefItem::section(""));

        assert_eq!(
            writer.finish(),
            "[A]\n\"x\"=\"1\"\n\"y\"=\"2\"\n\n[B]\n\"Data\"=hex:0a,ff\n"
        );
    }

    #[test]
    fn test_unregistered_category_is_an_error() {
        let theme_id = Uuid::from_u128(5);
        let mut registry = ColorRegistry::new();
        registry
            .get_or_create_entry(theme_id, ColorName::new(Uuid::from_u128(77), "Orphan"))
            .foreground = ColorValue::raw(1);

        assert!(matches!(render_pkgdef(&registry), Err(ThemeError::Encode { .. })));
    }
}
