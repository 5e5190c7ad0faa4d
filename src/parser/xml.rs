//! XML theme document reader.
//!
//! Builds a `ColorRegistry` from `<Themes>` documents. The reader performs no
//! schema validation: unknown elements are ignored, unparsable ids leave the
//! current context unchanged, and raw colour sources are byte-swapped into
//! host order on the way in.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use uuid::Uuid;

use crate::error::{Result, ThemeError};
use crate::registry::{ColorName, ColorRegistry};
use crate::types::{swap_argb_abgr, ColorType, ColorValue};

/// Read an XML theme file. A missing or empty file yields a registry with
/// only the built-in themes.
pub fn read_xml_file(path: &Path) -> Result<ColorRegistry> {
    let is_empty = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    if is_empty {
        return Ok(ColorRegistry::new());
    }

    let xml = fs::read_to_string(path).map_err(|e| ThemeError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read XML theme: {}", e),
    })?;
    parse_xml_theme(&xml)
}

/// Parse an XML theme document into a registry.
pub fn parse_xml_theme(xml: &str) -> Result<ColorRegistry> {
    let mut registry = ColorRegistry::new();
    if xml.trim().is_empty() {
        return Ok(registry);
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut theme: Option<Uuid> = None;
    let mut category: Option<Uuid> = None;
    let mut color: Option<ColorName> = None;

    loop {
        buf.clear();
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                return Err(ThemeError::Parse {
                    message: format!(
                        "Invalid XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    ),
                    help: None,
                })
            }
        };
        let self_closing = matches!(event, Event::Empty(_));

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let attrs = collect_attrs(e)?;
                let attr = |name: &str| attrs.get(name).map(|s| s.as_str());

                match e.name().as_ref() {
                    b"Theme" => {
                        color = None;
                        if let Some(id) = attr("GUID").and_then(parse_guid) {
                            let entry = registry.get_or_create_theme(id);
                            entry.name = attr("Name").unwrap_or_default().to_string();
                            if let Some(fallback) = attr("FallbackId").and_then(parse_guid) {
                                entry.fallback_id = Some(fallback);
                            }
                            theme = Some(id);
                        }
                    }
                    b"Category" => {
                        color = None;
                        if let Some(id) = attr("GUID").and_then(parse_guid) {
                            registry.register_category(id, attr("Name").unwrap_or_default());
                            category = Some(id);
                        }
                    }
                    b"Color" => {
                        let (Some(theme_id), Some(category_id)) = (theme, category) else {
                            return Err(ThemeError::parse(
                                "<Color> must appear inside a <Theme> and <Category>",
                            ));
                        };
                        let name = attr("Name")
                            .ok_or_else(|| ThemeError::parse("<Color> is missing its Name"))?;
                        let key = ColorName::new(category_id, name);
                        registry.get_or_create_entry(theme_id, key.clone());
                        color = (!self_closing).then_some(key);
                    }
                    tag @ (b"Background" | b"Foreground") => {
                        let (Some(theme_id), Some(key)) = (theme, color.as_ref()) else {
                            return Err(ThemeError::parse(
                                "<Background>/<Foreground> must appear inside a <Color>",
                            ));
                        };
                        let entry = registry.get_or_create_entry(theme_id, key.clone());
                        let current = if tag == b"Background" {
                            &mut entry.background
                        } else {
                            &mut entry.foreground
                        };
                        *current = read_value(*current, attr("Type"), attr("Source"));
                    }
                    _ => {}
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"Color" => color = None,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(registry)
}

/// Apply a `Type`/`Source` pair to an existing value. Attributes that fail to
/// parse leave the corresponding part unchanged.
fn read_value(current: ColorValue, kind: Option<&str>, source: Option<&str>) -> ColorValue {
    let kind = kind
        .and_then(ColorType::from_name)
        .unwrap_or(current.kind());
    let source = source
        .and_then(|s| u32::from_str_radix(s.trim(), 16).ok())
        .map(|s| swap_argb_abgr(s, kind))
        .unwrap_or(current.source());
    ColorValue::new(kind, source)
}

fn parse_guid(s: &str) -> Option<Uuid> {
    Uuid::parse_str(s.trim()).ok()
}

fn collect_attrs(e: &BytesStart) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ThemeError::parse(format!("Invalid XML attribute: {}", e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = quick_xml::escape::unescape(&raw)
            .map_err(|e| ThemeError::parse(format!("Invalid XML escape in '{}': {}", key, e)))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}
