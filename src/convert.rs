//! Conversion pipeline: source JSON -> resolved slots -> registry -> output.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::encode::{save_registry, OutputTarget};
use crate::error::{Result, ThemeError};
use crate::mapping::MappingTables;
use crate::parser::ThemeSource;
use crate::registry::{ColorName, ColorRegistry, DARK_THEME_ID, LIGHT_THEME_ID};
use crate::resolve::{ResolvedTheme, Resolver};
use crate::types::{swap_argb_abgr, ColorType, ColorValue, Colour};

/// Options for a single conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Use this id for the new theme instead of a random one.
    pub theme_id: Option<Uuid>,
    pub format: OutputTarget,
}

/// Everything produced by converting one theme.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub name: String,
    pub theme_id: Uuid,
    pub resolved: ResolvedTheme,
    pub registry: ColorRegistry,
}

/// Drives resolution and registry population for source themes.
pub struct Converter<'a> {
    tables: &'a MappingTables,
}

impl<'a> Converter<'a> {
    pub fn new(tables: &'a MappingTables) -> Self {
        Self { tables }
    }

    /// Convert a parsed theme.
    pub fn convert_source(&self, name: &str, source: &ThemeSource, theme_id: Option<Uuid>) -> Result<Conversion> {
        let theme_id = theme_id.unwrap_or_else(Uuid::new_v4);
        let resolved = Resolver::new(self.tables).resolve(source)?;
        let registry = self.build_registry(name, theme_id, source.is_dark(), &resolved)?;

        Ok(Conversion {
            name: name.to_string(),
            theme_id,
            resolved,
            registry,
        })
    }

    /// Parse theme JSON and convert it.
    pub fn convert_str(&self, name: &str, json: &str, theme_id: Option<Uuid>) -> Result<Conversion> {
        let source = ThemeSource::parse(json)?;
        self.convert_source(name, &source, theme_id)
    }

    /// Convert a theme file into `out_dir/<stem>.<ext>` and return the
    /// written path.
    pub fn convert_file(&self, input: &Path, out_dir: &Path, options: &ConvertOptions) -> Result<PathBuf> {
        let name = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| ThemeError::Io {
                path: input.to_path_buf(),
                message: "Input has no file name".to_string(),
            })?;

        let json = fs::read_to_string(input).map_err(|e| ThemeError::Io {
            path: input.to_path_buf(),
            message: format!("Failed to read theme: {}", e),
        })?;

        let conversion = self.convert_str(&name, &json, options.theme_id)?;
        let output = out_dir.join(format!("{}.{}", name, options.format.extension()));
        save_registry(&conversion.registry, &output)?;
        Ok(output)
    }

    /// Build a registry holding one new theme filled from `resolved`.
    pub fn build_registry(
        &self,
        name: &str,
        theme_id: Uuid,
        is_dark: bool,
        resolved: &ResolvedTheme,
    ) -> Result<ColorRegistry> {
        let mut registry = ColorRegistry::new();

        let theme = registry.get_or_create_theme(theme_id);
        theme.name = name.to_string();
        theme.fallback_id = Some(if is_dark { DARK_THEME_ID } else { LIGHT_THEME_ID });

        for (category_name, keys) in resolved.categories() {
            let category_id = self
                .tables
                .category_id(category_name)
                .ok_or_else(|| ThemeError::Mapping {
                    message: format!("Category '{}' has no GUID", category_name),
                    help: Some(format!("Add \"{}\" to CategoryGuid.json", category_name)),
                })?;
            registry.register_category(category_id, category_name);

            for (key, colors) in keys {
                if colors.is_empty() {
                    continue;
                }
                let entry = registry.get_or_create_entry(theme_id, ColorName::new(category_id, key.as_str()));
                if let Some(background) = &colors.background {
                    entry.background = raw_value(background)?;
                }
                if let Some(foreground) = &colors.foreground {
                    entry.foreground = raw_value(foreground)?;
                }
            }
        }

        Ok(registry)
    }
}

/// A source colour string as a raw value in host byte order.
fn raw_value(color: &str) -> Result<ColorValue> {
    let argb = Colour::from_source(color)?.to_argb();
    Ok(ColorValue::raw(swap_argb_abgr(argb, ColorType::Raw)))
}
