//! Document synthesis from the collection alone
//!
//! Used when the primary converter refuses a collection. Every URL shape is
//! accepted; unparseable ones are reduced to a best-effort path and reported
//! as warnings.

use crate::schema::synthesize_operation;
use crate::url::normalize_path;
use crate::variables::VariableMap;
use crate::walker::{walk, Leaf};
use oasify_common::{ConversionLog, ConvertOptions};
use oasify_parser::openapi::{Info, OpenApiDocument, Operation, Server};
use oasify_parser::postman::Collection;

/// Title used when the collection has no name
pub const DEFAULT_TITLE: &str = "API Documentation";

/// Description used when the collection has none
pub const DEFAULT_DESCRIPTION: &str = "API documentation generated from Postman collection";

/// Version used for synthesized documents
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Build a complete OpenAPI document from a collection
pub fn synthesize(
    collection: &Collection,
    options: &ConvertOptions,
    log: &dyn ConversionLog,
) -> OpenApiDocument {
    let variables = VariableMap::from_collection(collection);
    let mut document = OpenApiDocument::new(collection_info(collection));
    document.servers.push(Server {
        url: variables.server_url(),
        description: Some("API server".to_string()),
        ..Default::default()
    });

    walk(collection, |leaf| {
        let normalized = normalize_path(&leaf.request.url, &variables);
        if normalized.best_effort {
            log.warn(&format!(
                "Could not parse URL for {}, using path {}",
                leaf.name(),
                normalized.path
            ));
        }

        let method = leaf.request.method();
        let operation = build_operation(&leaf, &normalized.path, options);
        let item = document.paths.entry(normalized.path.clone()).or_default();
        if !item.set_operation(&method, operation) {
            log.warn(&format!(
                "Skipping {}: unsupported HTTP method {}",
                leaf.name(),
                method.to_uppercase()
            ));
        }
    });

    // a path whose only requests had unsupported methods
    document.paths.retain(|_, item| !item.methods().is_empty());
    document
}

/// `info` from the collection's name and description
pub(crate) fn collection_info(collection: &Collection) -> Info {
    Info {
        title: collection
            .info
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: Some(
            collection
                .info
                .description
                .as_ref()
                .and_then(|d| d.text())
                .unwrap_or(DEFAULT_DESCRIPTION)
                .to_string(),
        ),
        version: DEFAULT_VERSION.to_string(),
        ..Default::default()
    }
}

/// Operation for a leaf: synthesized schemas plus tag, summary, description
pub(crate) fn build_operation(leaf: &Leaf<'_>, path: &str, options: &ConvertOptions) -> Operation {
    let mut operation = synthesize_operation(leaf.request, path, leaf.auth);
    operation.tags = vec![leaf
        .top_folder
        .unwrap_or(options.default_tag.as_str())
        .to_string()];
    operation.summary = Some(leaf.name().to_string()).filter(|s| !s.is_empty());
    operation.description = leaf
        .request
        .description
        .as_ref()
        .and_then(|d| d.text())
        .map(String::from);
    operation
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasify_common::{RecordingLog, SilentLog};
    use oasify_parser::postman::CollectionParser;

    fn parse(json: &str) -> Collection {
        CollectionParser::from_json(json).unwrap().into_collection()
    }

    #[test]
    fn test_info_and_server_defaults() {
        let document = synthesize(&parse("{}"), &ConvertOptions::default(), &SilentLog);
        assert_eq!(document.openapi, "3.0.0");
        assert_eq!(document.info.title, DEFAULT_TITLE);
        assert_eq!(document.info.description.as_deref(), Some(DEFAULT_DESCRIPTION));
        assert_eq!(document.info.version, DEFAULT_VERSION);
        assert_eq!(document.servers[0].url, "https://api.example.com");
        assert!(document.paths.is_empty());
    }

    #[test]
    fn test_info_from_collection() {
        let collection = parse(
            r#"{"info": {"name": "Shop", "description": {"content": "Shop API"}},
                "variable": [{"key": "baseUrl", "value": "https://shop.io/v1/"}]}"#,
        );
        let document = synthesize(&collection, &ConvertOptions::default(), &SilentLog);
        assert_eq!(document.info.title, "Shop");
        assert_eq!(document.info.description.as_deref(), Some("Shop API"));
        assert_eq!(document.servers[0].url, "https://shop.io/v1");
    }

    #[test]
    fn test_tags_and_last_leaf_wins() {
        let collection = parse(
            r#"{"item": [
                {"name": "Health", "request": {"method": "get", "url": "{{url}}/health"}},
                {"name": "Pets", "item": [
                    {"name": "First", "request": {"method": "GET", "url": "{{url}}/pets"}},
                    {"name": "Second", "request": {"method": "GET", "url": "{{url}}/pets"}}
                ]}
            ]}"#,
        );
        let options = ConvertOptions::default().with_default_tag("Misc");
        let document = synthesize(&collection, &options, &SilentLog);

        let health = document.paths["/health"].operation("get").unwrap();
        assert_eq!(health.tags, vec!["Misc"]);

        let pets = document.paths["/pets"].operation("get").unwrap();
        assert_eq!(pets.tags, vec!["Pets"]);
        assert_eq!(pets.summary.as_deref(), Some("Second"));
    }

    #[test]
    fn test_malformed_urls_are_warned_not_fatal() {
        let collection = parse(
            r#"{"item": [
                {"name": "Odd", "request": {"method": "GET", "url": {"raw": "{{host}}/odd/{{x}}"}}},
                {"name": "Connect", "request": {"method": "CONNECT", "url": "https://a.io/tunnel"}}
            ]}"#,
        );
        let log = RecordingLog::new();
        let document = synthesize(&collection, &ConvertOptions::default(), &log);

        assert!(document.paths["/odd/{x}"].operation("get").is_some());
        assert!(!document.paths.contains_key("/tunnel"));
        let warnings = log.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Odd"));
        assert!(warnings[1].contains("CONNECT"));
    }
}
