//! Category and colour records.
//!
//! ```text
//! CategoryCollectionRecord := count:int32, CategoryRecord{count}
//! CategoryRecord           := guid:16, colorCount:int32, ColorRecord{colorCount}
//! ColorRecord              := nameLen:int32, name:utf8,
//!                             bgType:u8, [bg:u32],
//!                             fgType:u8, [fg:u32]
//! ```
//!
//! Value fields are present only for valid colour types.

use uuid::Uuid;

use crate::error::{Result, ThemeError};
use crate::registry::ColorEntry;
use crate::types::{ColorType, ColorValue};

use super::{read_versioned, write_versioned, ByteReader, ByteWriter, EXPECTED_VERSION};

/// One named colour's wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRecord {
    pub name: String,
    pub background: ColorValue,
    pub foreground: ColorValue,
}

impl ColorRecord {
    pub fn from_entry(entry: &ColorEntry) -> Self {
        Self {
            name: entry.name().name.clone(),
            background: entry.background,
            foreground: entry.foreground,
        }
    }

    pub fn write(&self, w: &mut ByteWriter) -> Result<()> {
        let name = self.name.as_bytes();
        w.write_len(name.len())?;
        w.write_bytes(name);
        write_value(w, self.background);
        write_value(w, self.foreground);
        Ok(())
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let len = r.read_len()?;
        let name = std::str::from_utf8(r.take(len)?)
            .map_err(|e| ThemeError::decode(format!("Colour name is not UTF-8: {}", e)))?
            .to_string();
        let background = read_value(r)?;
        let foreground = read_value(r)?;
        Ok(Self {
            name,
            background,
            foreground,
        })
    }
}

/// All colours of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub category: Uuid,
    pub colors: Vec<ColorRecord>,
}

impl CategoryRecord {
    pub fn new(category: Uuid) -> Self {
        Self {
            category,
            colors: Vec::new(),
        }
    }

    pub fn write(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_guid(self.category);
        w.write_len(self.colors.len())?;
        for color in &self.colors {
            color.write(w)?;
        }
        Ok(())
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let category = r.read_guid()?;
        let count = r.read_len()?;
        let colors = (0..count)
            .map(|_| ColorRecord::read(r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { category, colors })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCollectionRecord {
    pub categories: Vec<CategoryRecord>,
}

impl CategoryCollectionRecord {
    pub fn write(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_len(self.categories.len())?;
        for category in &self.categories {
            category.write(w)?;
        }
        Ok(())
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let count = r.read_len()?;
        let categories = (0..count)
            .map(|_| CategoryRecord::read(r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { categories })
    }
}

/// Serialise one category's non-empty entries into a versioned blob.
pub fn encode_category_blob<'e>(
    category: Uuid,
    entries: impl IntoIterator<Item = &'e ColorEntry>,
) -> Result<Vec<u8>> {
    let mut record = CategoryRecord::new(category);
    record.colors = entries
        .into_iter()
        .filter(|entry| !entry.is_empty)
        .map(ColorRecord::from_entry)
        .collect();

    let collection = CategoryCollectionRecord {
        categories: vec![record],
    };
    write_versioned(EXPECTED_VERSION, |w| collection.write(w))
}

/// Parse a versioned blob back into records.
pub fn decode_category_blob(bytes: &[u8]) -> Result<CategoryCollectionRecord> {
    let mut reader = read_versioned(bytes, EXPECTED_VERSION)?;
    let collection = CategoryCollectionRecord::read(&mut reader)?;
    if !reader.is_empty() {
        return Err(ThemeError::decode(format!(
            "{} trailing bytes after category records",
            reader.remaining()
        )));
    }
    Ok(collection)
}

fn write_value(w: &mut ByteWriter, value: ColorValue) {
    w.write_u8(value.kind().as_byte());
    if value.is_valid() {
        w.write_u32(value.source());
    }
}

/// Unknown type bytes read as invalid with no value field.
fn read_value(r: &mut ByteReader<'_>) -> Result<ColorValue> {
    let kind = ColorType::from_byte(r.read_u8()?);
    let source = if kind.carries_value() { r.read_u32()? } else { 0 };
    Ok(ColorValue::new(kind, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ColorName, ColorRegistry};
    use pretty_assertions::assert_eq;

    fn record(name: &str, background: ColorValue, foreground: ColorValue) -> ColorRecord {
        ColorRecord {
            name: name.to_string(),
            background,
            foreground,
        }
    }

    #[test]
    fn test_color_record_layout() {
        let mut w = ByteWriter::new();
        record("Ab", ColorValue::INVALID, ColorValue::raw(0x0102_0304))
            .write(&mut w)
            .unwrap();

        assert_eq!(
            w.into_bytes(),
            vec![2, 0, 0, 0, b'A', b'b', 0, 1, 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn test_color_record_round_trip() {
        let original = record(
            "ToolWindowText",
            ColorValue::new(ColorType::SysColor, 15),
            ColorValue::new(ColorType::Automatic, 0x1234),
        );
        let mut w = ByteWriter::new();
        original.write(&mut w).unwrap();
        let bytes = w.into_bytes();

        let decoded = ColorRecord::read(&mut ByteReader::new(&bytes)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_unknown_type_byte_reads_as_invalid() {
        // name "x", background type 9 (unknown), foreground type 2 with value
        let bytes = [1, 0, 0, 0, b'x', 9, 2, 7, 0, 0, 0];
        let mut reader = ByteReader::new(&bytes);
        let decoded = ColorRecord::read(&mut reader).unwrap();

        assert_eq!(decoded.background, ColorValue::INVALID);
        assert_eq!(decoded.foreground, ColorValue::new(ColorType::ColorIndex, 7));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_category_blob_round_trip() {
        let category = Uuid::from_u128(0x624ed9c3_bdfd_41fa_96c3_7c824ea32e3d);
        let theme = Uuid::from_u128(7);
        let mut registry = ColorRegistry::new();
        registry
            .get_or_create_entry(theme, ColorName::new(category, "ToolWindowText"))
            .foreground = ColorValue::raw(0xFF00_00FF);
        let empty = registry.get_or_create_entry(theme, ColorName::new(category, "Unused"));
        empty.is_empty = true;

        let entries = registry.theme(theme).unwrap().colors();
        let bytes = encode_category_blob(category, entries).unwrap();
        let decoded = decode_category_blob(&bytes).unwrap();

        assert_eq!(decoded.categories.len(), 1);
        assert_eq!(decoded.categories[0].category, category);
        assert_eq!(
            decoded.categories[0].colors,
            vec![record("ToolWindowText", ColorValue::INVALID, ColorValue::raw(0xFF00_00FF))]
        );
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let mut w = ByteWriter::new();
        CategoryCollectionRecord::default().write(&mut w).unwrap();
        w.write_u8(0);
        let payload = w.into_bytes();
        let bytes = write_versioned(EXPECTED_VERSION, |w| {
            w.write_bytes(&payload);
            Ok(())
        })
        .unwrap();
        assert!(decode_category_blob(&bytes).is_err());
    }
}
