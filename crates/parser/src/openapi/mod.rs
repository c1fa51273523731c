//! OpenAPI 3.0 document model
//!
//! Typed, order-preserving model of the OpenAPI documents the converter
//! produces and enriches, plus the YAML reader and writer.
//!
//! ## Usage
//! ```rust,ignore
//! use oasify_parser::openapi::{write_document, OpenApiParser};
//!
//! let mut document = OpenApiParser::from_file("openapi.yaml")?.into_document();
//! document.info.version = "2.0.0".to_string();
//! write_document(&document, "openapi.yaml")?;
//! ```

mod parser;
mod types;

pub use parser::{to_yaml, write_document, OpenApiParser};
pub use types::*;
