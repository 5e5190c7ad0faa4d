//! XML theme document output.
//!
//! Every theme lists each category's colours through the shared colour rows.
//! Entries that are missing or empty in a theme are skipped, and categories
//! or themes left with no children are not written.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::{Result, ThemeError};
use crate::registry::{Category, ColorEntry, ColorRegistry, Theme};
use crate::types::{swap_argb_abgr, ColorValue};

const INDENT: usize = 2;

struct CategoryNode<'r> {
    category: &'r Category,
    entries: Vec<&'r ColorEntry>,
}

struct ThemeNode<'r> {
    theme: &'r Theme,
    categories: Vec<CategoryNode<'r>>,
}

/// Render a registry as an XML theme document.
pub fn render_xml(registry: &ColorRegistry) -> Result<String> {
    let themes = collect(registry);

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    if themes.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("Themes")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("Themes")))?;
        for node in &themes {
            write_theme(&mut writer, node)?;
        }
        writer.write_event(Event::End(BytesEnd::new("Themes")))?;
    }

    String::from_utf8(writer.into_inner()).map_err(|e| ThemeError::Encode {
        message: format!("XML output is not UTF-8: {}", e),
        help: None,
    })
}

fn collect(registry: &ColorRegistry) -> Vec<ThemeNode<'_>> {
    registry
        .themes()
        .iter()
        .filter_map(|theme| {
            let categories: Vec<CategoryNode<'_>> = registry
                .categories()
                .iter()
                .filter_map(|category| {
                    let entries: Vec<&ColorEntry> = registry
                        .rows_in_category(category.id())
                        .filter_map(|row| theme.entry(row.name()))
                        .filter(|entry| !entry.is_empty)
                        .collect();
                    (!entries.is_empty()).then_some(CategoryNode { category, entries })
                })
                .collect();
            (!categories.is_empty()).then_some(ThemeNode { theme, categories })
        })
        .collect()
}

fn write_theme(writer: &mut Writer<Vec<u8>>, node: &ThemeNode<'_>) -> Result<()> {
    let theme = node.theme;
    let id = theme.id().braced().to_string();
    let mut start = BytesStart::new("Theme");
    start.push_attribute(("Name", theme.name.as_str()));
    start.push_attribute(("GUID", id.as_str()));
    if let Some(fallback) = theme.fallback_id {
        let fallback = fallback.braced().to_string();
        start.push_attribute(("FallbackId", fallback.as_str()));
    }
    writer.write_event(Event::Start(start))?;

    for category in &node.categories {
        let id = category.category.id().braced().to_string();
        let mut start = BytesStart::new("Category");
        start.push_attribute(("Name", category.category.name()));
        start.push_attribute(("GUID", id.as_str()));
        writer.write_event(Event::Start(start))?;

        for entry in &category.entries {
            write_color(writer, entry)?;
        }
        writer.write_event(Event::End(BytesEnd::new("Category")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Theme")))?;
    Ok(())
}

fn write_color(writer: &mut Writer<Vec<u8>>, entry: &ColorEntry) -> Result<()> {
    let mut start = BytesStart::new("Color");
    start.push_attribute(("Name", entry.name().name.as_str()));

    if !entry.background.is_valid() && !entry.foreground.is_valid() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    write_value(writer, "Background", entry.background)?;
    write_value(writer, "Foreground", entry.foreground)?;
    writer.write_event(Event::End(BytesEnd::new("Color")))?;
    Ok(())
}

fn write_value(writer: &mut Writer<Vec<u8>>, tag: &str, value: ColorValue) -> Result<()> {
    if !value.is_valid() {
        return Ok(());
    }

    let source = format!("{:08X}", swap_argb_abgr(value.source(), value.kind()));
    let mut element = BytesStart::new(tag);
    element.push_attribute(("Type", value.kind().name()));
    element.push_attribute(("Source", source.as_str()));
    writer.write_event(Event::Empty(element))?;
    Ok(())
}
