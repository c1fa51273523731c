//! Document readers for oasify
//!
//! This crate decodes the two documents the converter works with:
//!
//! - [`postman`]: Postman Collection v2.x JSON (BOM tolerant, UTF-8 / UTF-16)
//! - [`openapi`]: OpenAPI 3.0 YAML, read and written through an ordered model

pub mod openapi;
pub mod postman;

pub use openapi::{OpenApiDocument, OpenApiParser};
pub use postman::{Collection, CollectionParser};
