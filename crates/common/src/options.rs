//! Conversion options
//!
//! Options can be built in code, or loaded from a YAML/JSON options file
//! (JSON is accepted because it is valid YAML).

use crate::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tag applied to operations that do not live inside a folder
pub const DEFAULT_TAG: &str = "General";

/// Options recognized by the synthesizer and the response injector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Tag for root-level requests
    #[serde(default = "default_tag")]
    pub default_tag: String,

    /// Per-field overlay for the document's `info` block
    #[serde(default)]
    pub info: InfoOverride,
}

/// Replacement values for `info`; only fields that are set are applied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoOverride {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            default_tag: default_tag(),
            info: InfoOverride::default(),
        }
    }
}

impl ConvertOptions {
    /// Load options from a YAML or JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConverterError::Parse(format!("Failed to read options file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            ConverterError::Parse(format!(
                "Failed to parse options from {:?}: {}",
                path, e
            ))
        })
    }

    /// Builder-style setter for the default tag
    pub fn with_default_tag(mut self, tag: impl Into<String>) -> Self {
        self.default_tag = tag.into();
        self
    }

    /// Builder-style setter for the info overlay
    pub fn with_info(mut self, info: InfoOverride) -> Self {
        self.info = info;
        self
    }
}

impl InfoOverride {
    /// True when no field would be overlaid
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.version.is_none()
    }

    /// Fields from `other` win where they are set
    pub fn merged_with(self, other: InfoOverride) -> InfoOverride {
        InfoOverride {
            title: other.title.or(self.title),
            description: other.description.or(self.description),
            version: other.version.or(self.version),
        }
    }
}
