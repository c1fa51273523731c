//! OpenAPI document reader and writer

use super::types::OpenApiDocument;
use oasify_common::{ConverterError, Result};
use std::fs;
use std::path::Path;

/// OpenAPI document parser
///
/// Reads OpenAPI 3.0 documents in YAML (or JSON, which YAML accepts).
pub struct OpenApiParser {
    document: OpenApiDocument,
}

impl OpenApiParser {
    /// Load an OpenAPI document from file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ConverterError::Parse(format!(
                "Failed to read OpenAPI file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse an OpenAPI document from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: OpenApiDocument = serde_yaml::from_str(yaml)
            .map_err(|e| ConverterError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;

        Ok(Self { document })
    }

    /// Get reference to the parsed document
    pub fn document(&self) -> &OpenApiDocument {
        &self.document
    }

    /// Take ownership of the parsed document
    pub fn into_document(self) -> OpenApiDocument {
        self.document
    }
}

/// Serialize a document as YAML (2-space indentation)
pub fn to_yaml(document: &OpenApiDocument) -> Result<String> {
    Ok(serde_yaml::to_string(document)?)
}

/// Write a document as YAML, creating parent directories as needed
pub fn write_document<P: AsRef<Path>>(document: &OpenApiDocument, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ConverterError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create output directory {}: {}", parent.display(), e),
            ))
        })?;
    }

    let yaml = to_yaml(document)?;
    fs::write(path, yaml)?;
    Ok(())
}
