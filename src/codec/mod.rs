//! Versioned little-endian binary codec for category blobs.
//!
//! A blob is a length-prefixed, version-tagged block:
//!
//! ```text
//! totalLength:int32   bytes of the whole block, header included
//! version:int32       EXPECTED_VERSION
//! payload             CategoryCollectionRecord
//! ```
//!
//! Readers reject any other version. Writers refuse payloads that would push
//! the block past [`MAX_BLOB_SIZE`].

mod records;

use uuid::Uuid;

use crate::error::{Result, ThemeError};

pub use records::{decode_category_blob, encode_category_blob, CategoryCollectionRecord, CategoryRecord, ColorRecord};

/// Version tag written at the head of every blob.
pub const EXPECTED_VERSION: i32 = 11;

/// Upper bound on the size of one serialised blob.
pub const MAX_BLOB_SIZE: usize = 1_000_000;

const HEADER_LEN: usize = 8;

/// Append-only little-endian writer.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a count or length as an `int32`.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| ThemeError::Encode {
            message: format!("Length {} does not fit in a 32-bit record field", len),
            help: None,
        })?;
        self.write_i32(len);
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// GUIDs use the mixed-endian layout (first three fields little-endian).
    pub fn write_guid(&mut self, id: Uuid) {
        self.buf.extend_from_slice(&id.to_bytes_le());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a byte slice; every read fails cleanly on truncation.
#[derive(Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.saturating_add(len);
        if end > self.bytes.len() {
            return Err(ThemeError::decode(format!(
                "Unexpected end of data: needed {} bytes at offset {}, {} available",
                len,
                self.pos,
                self.remaining()
            )));
        }
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let raw = self.take(4)?;
        Ok(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let raw = self.take(4)?;
        Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    /// Read a non-negative `int32` count or length.
    pub fn read_len(&mut self) -> Result<usize> {
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| ThemeError::decode(format!("Negative length {}", len)))
    }

    pub fn read_guid(&mut self) -> Result<Uuid> {
        let raw = self.take(16)?;
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(raw);
        Ok(Uuid::from_bytes_le(bytes))
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

/// Write a versioned block: header, then whatever `body` writes.
pub fn write_versioned(version: i32, body: impl FnOnce(&mut ByteWriter) -> Result<()>) -> Result<Vec<u8>> {
    let mut payload = ByteWriter::new();
    body(&mut payload)?;

    let total = HEADER_LEN + payload.len();
    if total > MAX_BLOB_SIZE {
        return Err(ThemeError::Encode {
            message: format!(
                "Serialised blob is {} bytes, above the {} byte limit",
                total, MAX_BLOB_SIZE
            ),
            help: Some("Split the theme into fewer colours per category".to_string()),
        });
    }

    let mut out = ByteWriter::new();
    out.write_len(total)?;
    out.write_i32(version);
    out.write_bytes(&payload.into_bytes());
    Ok(out.into_bytes())
}

/// Check a versioned block's header and return a reader over its payload.
pub fn read_versioned(bytes: &[u8], expected_version: i32) -> Result<ByteReader<'_>> {
    let mut reader = ByteReader::new(bytes);
    let total = reader.read_len()?;
    if total != bytes.len() {
        return Err(ThemeError::decode(format!(
            "Blob length field says {} bytes, found {}",
            total,
            bytes.len()
        )));
    }

    let version = reader.read_i32()?;
    if version != expected_version {
        return Err(ThemeError::decode(format!(
            "Unsupported blob version {} (expected {})",
            version, expected_version
        )));
    }

    Ok(ByteReader::new(&bytes[HEADER_LEN..]))
}
