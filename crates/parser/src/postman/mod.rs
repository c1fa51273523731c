//! Postman Collection v2.x reader
//!
//! Decodes exported collections into a typed tree: folders and request leaves
//! are told apart once at decode time, and every URL is resolved into one of
//! three shapes (bare string, structured path, raw template).
//!
//! ## Usage
//! ```rust,ignore
//! use oasify_parser::postman::CollectionParser;
//!
//! let collection = CollectionParser::from_file("api.postman_collection.json")?
//!     .into_collection();
//! ```

mod parser;
mod types;

pub use parser::CollectionParser;
pub use types::*;
