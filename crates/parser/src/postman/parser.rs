//! Postman collection file reader

use super::types::Collection;
use oasify_common::{ConverterError, Result};
use std::fs;
use std::path::Path;

/// Postman collection parser
///
/// Reads collection files exported by Postman. Exports written by Windows
/// tooling are often UTF-16 or carry a UTF-8 byte order mark, so the raw bytes
/// are sniffed before JSON decoding.
pub struct CollectionParser {
    collection: Collection,
}

impl CollectionParser {
    /// Load a collection from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            ConverterError::Parse(format!(
                "Failed to read Postman collection {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_bytes(&bytes)
    }

    /// Decode raw file bytes (UTF-8 with or without BOM, UTF-16 LE/BE)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = decode_text(bytes)?;
        Self::from_json(&text)
    }

    /// Parse a collection from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let collection: Collection = serde_json::from_str(json).map_err(|e| {
            ConverterError::Parse(format!("Failed to parse Postman collection JSON: {}", e))
        })?;

        Ok(Self { collection })
    }

    /// Get reference to the parsed collection
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Take ownership of the parsed collection
    pub fn into_collection(self) -> Collection {
        self.collection
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

/// Detect the encoding and return the text without its byte order mark
fn sniff_encoding(bytes: &[u8]) -> (TextEncoding, &[u8]) {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => (TextEncoding::Utf8, rest),
        [0xFF, 0xFE, rest @ ..] => (TextEncoding::Utf16Le, rest),
        [0xFE, 0xFF, rest @ ..] => (TextEncoding::Utf16Be, rest),
        // JSON starts with an ASCII character, so a NUL byte next to it gives
        // away BOM-less UTF-16
        [0x00, b, ..] if *b != 0 => (TextEncoding::Utf16Be, bytes),
        [b, 0x00, ..] if *b != 0 => (TextEncoding::Utf16Le, bytes),
        _ => (TextEncoding::Utf8, bytes),
    }
}

fn decode_text(bytes: &[u8]) -> Result<String> {
    let (encoding, body) = sniff_encoding(bytes);

    match encoding {
        TextEncoding::Utf8 => String::from_utf8(body.to_vec()).map_err(|e| {
            ConverterError::Parse(format!("Postman collection is not valid UTF-8: {}", e))
        }),
        TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
            if body.len() % 2 != 0 {
                return Err(ConverterError::Parse(
                    "Postman collection has a truncated UTF-16 code unit".to_string(),
                ));
            }
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|pair| match encoding {
                    TextEncoding::Utf16Le => u16::from_le_bytes([pair[0], pair[1]]),
                    _ => u16::from_be_bytes([pair[0], pair[1]]),
                })
                .collect();
            String::from_utf16(&units).map_err(|e| {
                ConverterError::Parse(format!("Postman collection is not valid UTF-16: {}", e))
            })
        }
    }
}
