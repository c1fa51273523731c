//! Example response injection
//!
//! Enriches an existing OpenAPI document with the collection's saved example
//! responses, and applies the `info` and server URL overlays. Injection only
//! augments operations that already exist; it never adds paths.

use crate::url::normalize_path;
use crate::variables::VariableMap;
use crate::walker::walk;
use indexmap::IndexMap;
use oasify_common::{ConversionLog, ConvertOptions, InfoOverride};
use oasify_parser::openapi::{Info, MediaType, OpenApiDocument, Response};
use oasify_parser::postman::Collection;
use serde_json::Value;

/// Enriched document and the number of operations that received an example
#[derive(Debug, Clone, PartialEq)]
pub struct Injection {
    pub document: OpenApiDocument,
    pub enhanced_count: usize,
}

/// Enrich `document` with examples and overlays from `collection`
pub fn inject(
    collection: &Collection,
    mut document: OpenApiDocument,
    options: &ConvertOptions,
    log: &dyn ConversionLog,
) -> Injection {
    let enhanced_count = inject_in_place(collection, &mut document, options, log);
    Injection {
        document,
        enhanced_count,
    }
}

/// In-place variant of [`inject`]; returns the enhanced operation count
pub fn inject_in_place(
    collection: &Collection,
    document: &mut OpenApiDocument,
    options: &ConvertOptions,
    log: &dyn ConversionLog,
) -> usize {
    let variables = VariableMap::from_collection(collection);

    if !options.info.is_empty() {
        apply_info(&mut document.info, &options.info);
        log.success(&format!(
            "Applied custom API info: {} v{}",
            document.info.title, document.info.version
        ));
    }

    if let Some(server) = document.servers.first_mut() {
        if let Some(url) = variables.resolve_server_url(&server.url) {
            log.info(&format!("Resolved server URL {} -> {}", server.url, url));
            server.url = url;
        }
    }

    let mut enhanced_count = 0;
    walk(collection, |leaf| {
        let Some(example) = leaf.example else {
            return;
        };

        let path = normalize_path(&leaf.request.url, &variables).path;
        let method = leaf.request.method();
        let Some(operation) = document.operation_mut(&path, &method) else {
            return;
        };

        let body = match example_body(example.body.as_ref()) {
            ExampleBody::Missing => return,
            ExampleBody::Invalid => {
                log.warn(&format!(
                    "Could not parse response body for {} {}",
                    method.to_uppercase(),
                    path
                ));
                return;
            }
            ExampleBody::Json(body) => body,
        };

        let mut content = IndexMap::new();
        content.insert(
            "application/json".to_string(),
            MediaType {
                example: Some(body),
                ..Default::default()
            },
        );
        operation.responses.insert(
            example.status_key(),
            Response {
                description: Some(format!("Example response for {}", leaf.name())),
                content,
                ..Default::default()
            },
        );

        enhanced_count += 1;
        log.success(&format!("Enhanced: {} {}", method.to_uppercase(), path));
    });

    enhanced_count
}

/// Overlay only the fields that are set
fn apply_info(info: &mut Info, overlay: &InfoOverride) {
    if let Some(title) = &overlay.title {
        info.title = title.clone();
    }
    if let Some(description) = &overlay.description {
        info.description = Some(description.clone());
    }
    if let Some(version) = &overlay.version {
        info.version = version.clone();
    }
}

enum ExampleBody {
    Missing,
    Invalid,
    Json(Value),
}

/// String bodies are JSON-decoded, structured bodies are used as-is
fn example_body(body: Option<&Value>) -> ExampleBody {
    match body {
        None | Some(Value::Null) => ExampleBody::Missing,
        Some(Value::String(text)) if text.trim().is_empty() => ExampleBody::Missing,
        Some(Value::String(text)) => match serde_json::from_str(text) {
            Ok(parsed) => ExampleBody::Json(parsed),
            Err(_) => ExampleBody::Invalid,
        },
        Some(other) => ExampleBody::Json(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasify_common::{RecordingLog, SilentLog};
    use oasify_parser::openapi::{OpenApiParser, Server};
    use oasify_parser::postman::CollectionParser;
    use serde_json::json;

    const BASE: &str = r#"
openapi: 3.0.0
info:
  title: Original
  description: Original description
  version: 0.0.1
servers:
  - url: https://{{baseUrl}}/
paths:
  /users/{id}:
    get:
      responses:
        '200':
          description: OK
  /orders:
    post:
      responses:
        '200':
          description: OK
"#;

    const COLLECTION: &str = r#"{
        "info": {"name": "Shop"},
        "variable": [{"key": "baseUrl", "value": "api.example.com"}],
        "item": [
            {"name": "Get User", "request": {"method": "GET", "url": "{{url}}/users/{{id}}"},
             "response": [{"code": 201, "body": "{\"id\": 5}"}, {"code": 500, "body": "{}"}]},
            {"name": "Create Order", "request": {"method": "POST", "url": "{{url}}/orders"},
             "response": [{"status": "Created", "body": {"ok": true}}]},
            {"name": "Broken", "request": {"method": "POST", "url": "{{url}}/orders"},
             "response": [{"code": 400, "body": "<html>"}]},
            {"name": "Unknown", "request": {"method": "GET", "url": "{{url}}/missing"},
             "response": [{"code": 200, "body": "{}"}]},
            {"name": "No Body", "request": {"method": "GET", "url": "{{url}}/users/{{id}}"},
             "response": [{"code": 204}]}
        ]
    }"#;

    fn base() -> OpenApiDocument {
        OpenApiParser::from_yaml(BASE).unwrap().into_document()
    }

    fn collection() -> Collection {
        CollectionParser::from_json(COLLECTION).unwrap().into_collection()
    }

    #[test]
    fn test_examples_attached_to_existing_operations() {
        let log = RecordingLog::new();
        let injection = inject(&collection(), base(), &ConvertOptions::default(), &log);

        assert_eq!(injection.enhanced_count, 2);
        let document = &injection.document;

        let get = document.paths["/users/{id}"].operation("get").unwrap();
        let created = &get.responses["201"];
        assert_eq!(created.description.as_deref(), Some("Example response for Get User"));
        assert_eq!(created.content["application/json"].example, Some(json!({"id": 5})));
        assert!(!get.responses.contains_key("500"));
        assert!(get.responses.contains_key("200"));

        let post = document.paths["/orders"].operation("post").unwrap();
        assert_eq!(
            post.responses["Created"].content["application/json"].example,
            Some(json!({"ok": true}))
        );
        assert!(!post.responses.contains_key("400"));

        assert!(!document.paths.contains_key("/missing"));
        assert_eq!(log.warnings().len(), 1);
    }

    #[test]
    fn test_info_overlay_is_per_field() {
        let options = ConvertOptions::default().with_info(InfoOverride {
            title: Some("Shop API".to_string()),
            ..Default::default()
        });
        let document = inject(&collection(), base(), &options, &SilentLog).document;

        assert_eq!(document.info.title, "Shop API");
        assert_eq!(document.info.description.as_deref(), Some("Original description"));
        assert_eq!(document.info.version, "0.0.1");
    }

    #[test]
    fn test_server_url_resolved() {
        let document = inject(&collection(), base(), &ConvertOptions::default(), &SilentLog).document;
        assert_eq!(document.servers[0].url, "https://api.example.com");
    }

    #[test]
    fn test_unresolvable_server_url_is_kept() {
        let mut document = base();
        document.servers = vec![Server {
            url: "https://{{tenant}}.shop.io".to_string(),
            ..Default::default()
        }];
        let document = inject(&collection(), document, &ConvertOptions::default(), &SilentLog).document;
        assert_eq!(document.servers[0].url, "https://{{tenant}}.shop.io");
    }

    #[test]
    fn test_injection_is_idempotent() {
        let options = ConvertOptions::default();
        let once = inject(&collection(), base(), &options, &SilentLog);
        let twice = inject(&collection(), once.document.clone(), &options, &SilentLog);

        assert_eq!(once.enhanced_count, twice.enhanced_count);
        assert_eq!(
            serde_yaml::to_string(&once.document).unwrap(),
            serde_yaml::to_string(&twice.document).unwrap()
        );

        let again = inject(&collection(), base(), &options, &SilentLog);
        assert_eq!(
            serde_yaml::to_string(&once.document).unwrap(),
            serde_yaml::to_string(&again.document).unwrap()
        );
    }
}
