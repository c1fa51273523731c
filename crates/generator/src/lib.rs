//! OpenAPI synthesis and enrichment for Postman collections
//!
//! This crate turns a parsed Postman collection into an OpenAPI 3 document:
//!
//! 1. the primary converter builds a baseline document (strictly),
//! 2. if it refuses the collection, [`synthesize`] builds one leniently,
//! 3. [`inject`] attaches saved example responses and applies the `info` and
//!    server overlays.
//!
//! ## Usage
//! ```rust,ignore
//! use oasify_common::{ConvertOptions, SilentLog};
//! use oasify_generator::{convert_file, StrictConverter};
//!
//! let report = convert_file(
//!     "collection.json",
//!     "out/openapi.yaml",
//!     &ConvertOptions::default(),
//!     Some(&StrictConverter::new()),
//!     &SilentLog,
//! )?;
//! println!("{} endpoints enhanced", report.enhanced_count);
//! ```

mod fallback;
mod inject;
mod primary;
mod schema;
mod url;
mod variables;
mod walker;

pub use fallback::{synthesize, DEFAULT_DESCRIPTION, DEFAULT_TITLE, DEFAULT_VERSION};
pub use inject::{inject, inject_in_place, Injection};
pub use primary::{PrimaryConverter, StrictConverter};
pub use schema::{infer_schema, synthesize_operation, DEFAULT_API_KEY_HEADER};
pub use url::{normalize_path, path_placeholders, query_params, PathTemplate, PLACEHOLDER_ORIGIN};
pub use variables::{VariableMap, DEFAULT_BASE_URL};
pub use walker::{walk, Leaf};

use oasify_common::{ConversionLog, ConvertOptions, Result};
use oasify_parser::openapi::{write_document, OpenApiDocument, OpenApiParser};
use oasify_parser::postman::{Collection, CollectionParser};
use std::path::Path;

/// Outcome of a conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Final document
    pub document: OpenApiDocument,

    /// Operations that received an example response
    pub enhanced_count: usize,

    /// The baseline came from [`synthesize`] rather than the primary converter
    pub used_fallback: bool,
}

/// Convert a collection in memory
///
/// With `primary` set to `None` the fallback synthesizer is used directly.
pub fn convert(
    collection: &Collection,
    options: &ConvertOptions,
    primary: Option<&dyn PrimaryConverter>,
    log: &dyn ConversionLog,
) -> Conversion {
    let (document, used_fallback) = match primary.map(|p| p.convert(collection, options)) {
        Some(Ok(document)) => {
            log.success(&format!(
                "Converted {} operations",
                document.operation_count()
            ));
            (document, false)
        }
        Some(Err(e)) => {
            log.warn(&format!(
                "Primary conversion failed, using fallback synthesis: {}",
                e
            ));
            (synthesize(collection, options, log), true)
        }
        None => (synthesize(collection, options, log), true),
    };

    log.info("Injecting example responses and custom info...");
    let injection = inject(collection, document, options, log);
    log.info(&format!(
        "Enhanced {} API endpoints with example responses",
        injection.enhanced_count
    ));

    Conversion {
        document: injection.document,
        enhanced_count: injection.enhanced_count,
        used_fallback,
    }
}

/// Convert a collection file and write the result as YAML
///
/// The output directory is created when missing.
pub fn convert_file<I: AsRef<Path>, O: AsRef<Path>>(
    input: I,
    output: O,
    options: &ConvertOptions,
    primary: Option<&dyn PrimaryConverter>,
    log: &dyn ConversionLog,
) -> Result<Conversion> {
    let collection = CollectionParser::from_file(input)?.into_collection();
    let conversion = convert(&collection, options, primary, log);
    write_document(&conversion.document, output.as_ref())?;
    Ok(conversion)
}

/// Enrich an existing OpenAPI YAML file in place
///
/// Returns the number of enhanced operations.
pub fn inject_file<C: AsRef<Path>, D: AsRef<Path>>(
    collection: C,
    openapi: D,
    options: &ConvertOptions,
    log: &dyn ConversionLog,
) -> Result<usize> {
    let collection = CollectionParser::from_file(collection)?.into_collection();
    let mut document = OpenApiParser::from_file(openapi.as_ref())?.into_document();
    let enhanced_count = inject_in_place(&collection, &mut document, options, log);
    write_document(&document, openapi.as_ref())?;
    Ok(enhanced_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primary::MockPrimaryConverter;
    use oasify_common::{ConverterError, RecordingLog, SilentLog};
    use oasify_parser::openapi::Info;
    use serde_json::json;

    const USERS: &str = r#"{
        "info": {"name": "Users API"},
        "item": [{"name": "Users", "item": [
            {"name": "Get User",
             "request": {"method": "GET", "url": "{{url}}/users/{{id}}"},
             "response": [{"code": 201, "body": "{\"id\":5}"}]},
            {"name": "Create User",
             "request": {"method": "POST", "url": "{{url}}/users",
                         "body": {"mode": "raw", "raw": "{\"name\": \"x\"}"}}}
        ]}]
    }"#;

    fn users() -> Collection {
        CollectionParser::from_json(USERS).unwrap().into_collection()
    }

    #[test]
    fn test_primary_result_is_enriched() {
        let mut primary = MockPrimaryConverter::new();
        primary.expect_convert().times(1).returning(|_, _| {
            let mut document = OpenApiDocument::new(Info {
                title: "From primary".to_string(),
                version: "1".to_string(),
                ..Default::default()
            });
            document
                .paths
                .entry("/users/{id}".to_string())
                .or_default()
                .set_operation("get", Default::default());
            Ok(document)
        });

        let conversion = convert(&users(), &ConvertOptions::default(), Some(&primary), &SilentLog);
        assert!(!conversion.used_fallback);
        assert_eq!(conversion.enhanced_count, 1);
        assert_eq!(conversion.document.info.title, "From primary");
        assert!(!conversion.document.paths.contains_key("/users"));
    }

    #[test]
    fn test_primary_failure_switches_to_fallback() {
        let mut primary = MockPrimaryConverter::new();
        primary
            .expect_convert()
            .times(1)
            .returning(|_, _| Err(ConverterError::Conversion("bad url".to_string())));

        let log = RecordingLog::new();
        let conversion = convert(&users(), &ConvertOptions::default(), Some(&primary), &log);

        assert!(conversion.used_fallback);
        assert!(log.warnings()[0].contains("bad url"));

        let get = conversion.document.paths["/users/{id}"].operation("get").unwrap();
        assert_eq!(
            get.responses["201"].content["application/json"].example,
            Some(json!({"id": 5}))
        );
        assert!(conversion.document.paths["/users"].operation("post").is_some());
    }

    #[test]
    fn test_strict_converter_falls_back_on_templated_hosts() {
        let strict = StrictConverter::new();
        let conversion = convert(&users(), &ConvertOptions::default(), Some(&strict), &SilentLog);
        assert!(conversion.used_fallback);
        assert_eq!(conversion.enhanced_count, 1);
    }
}
