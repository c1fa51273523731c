//! Integration tests for the file-level conversion pipeline

use oasify_common::{ConvertOptions, InfoOverride, RecordingLog, SilentLog};
use oasify_generator::{convert_file, inject_file, StrictConverter};
use oasify_parser::openapi::{OpenApiParser, ParameterLocation};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const SHOP: &str = r#"{
    "info": {
        "name": "Shop",
        "description": "Shop API",
        "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
    },
    "variable": [{"key": "baseUrl", "value": "https://shop.io/v1"}],
    "auth": {"type": "bearer", "bearer": [{"key": "token", "value": "{{token}}"}]},
    "item": [
        {
            "name": "Health",
            "request": {"method": "GET", "url": "{{baseUrl}}/health", "auth": {"type": "noauth"}}
        },
        {
            "name": "Users",
            "item": [
                {
                    "name": "Get User",
                    "request": {
                        "method": "GET",
                        "header": [{"key": "Accept", "value": "application/json"}],
                        "url": {
                            "raw": "{{baseUrl}}/users/:id?expand=orders",
                            "host": ["{{baseUrl}}"],
                            "path": ["users", ":id"],
                            "query": [{"key": "expand", "value": "orders"}],
                            "variable": [{"key": "id", "value": "5", "description": "User id"}]
                        }
                    },
                    "response": [
                        {"name": "Found", "code": 200, "body": "{\"id\": 5, \"name\": \"Ada\"}"},
                        {"name": "Missing", "code": 404, "body": "{}"}
                    ]
                },
                {
                    "name": "Create User",
                    "request": {
                        "method": "POST",
                        "header": [{"key": "Content-Type", "value": "application/json"}],
                        "body": {
                            "mode": "raw",
                            "raw": "{\"name\": \"Ada\", \"age\": 36, \"tags\": [\"admin\"]}",
                            "options": {"raw": {"language": "json"}}
                        },
                        "url": "{{baseUrl}}/users"
                    },
                    "response": [{"name": "Created", "code": 201, "body": "{\"id\": 6}"}]
                }
            ]
        }
    ]
}"#;

fn write_collection(dir: &TempDir, name: &str, json: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_strict_conversion_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = write_collection(&dir, "shop.json", SHOP);
    let output = dir.path().join("out/nested/openapi.yaml");

    let conversion = convert_file(
        &input,
        &output,
        &ConvertOptions::default(),
        Some(&StrictConverter::new()),
        &SilentLog,
    )
    .unwrap();

    assert!(!conversion.used_fallback);
    assert_eq!(conversion.enhanced_count, 2);
    assert!(output.exists());

    let document = OpenApiParser::from_file(&output).unwrap().into_document();
    assert_eq!(document.info.title, "Shop");
    assert_eq!(document.info.description.as_deref(), Some("Shop API"));
    assert_eq!(document.servers[0].url, "https://shop.io/v1");

    let health = document.paths["/health"].operation("get").unwrap();
    assert_eq!(health.tags, vec!["General"]);
    assert!(health.parameters.is_empty());

    let get = document.paths["/users/{id}"].operation("get").unwrap();
    assert_eq!(get.tags, vec!["Users"]);
    let names: Vec<_> = get
        .parameters
        .iter()
        .filter_map(|p| p.as_parameter())
        .map(|p| (p.name.as_str(), p.location))
        .collect();
    assert_eq!(
        names,
        vec![
            ("expand", ParameterLocation::Query),
            ("id", ParameterLocation::Path),
            ("Authorization", ParameterLocation::Header),
            ("Accept", ParameterLocation::Header),
        ]
    );
    assert_eq!(
        get.responses["200"].content["application/json"].example,
        Some(json!({"id": 5, "name": "Ada"}))
    );
    assert!(!get.responses.contains_key("404"));

    let post = document.paths["/users"].operation("post").unwrap();
    let body = post.request_body.as_ref().unwrap();
    let schema = body.content["application/json"].schema.as_ref().unwrap();
    assert_eq!(schema.schema_type.as_deref(), Some("object"));
    assert_eq!(schema.properties["age"].schema_type.as_deref(), Some("number"));
    assert_eq!(
        schema.properties["tags"].items.as_ref().unwrap().schema_type.as_deref(),
        Some("string")
    );
    assert_eq!(
        post.responses["201"].content["application/json"].example,
        Some(json!({"id": 6}))
    );
}

#[test]
fn test_fallback_scenario_users_folder() {
    let dir = TempDir::new().unwrap();
    let input = write_collection(
        &dir,
        "users.json",
        r#"{
            "info": {"name": "Users API"},
            "item": [{"name": "Users", "item": [
                {"name": "Get User",
                 "request": {"method": "GET", "url": "{{url}}/users/{{id}}"},
                 "response": [{"code": 201, "body": "{\"id\":5}"}]}
            ]}]
        }"#,
    );
    let output = dir.path().join("openapi.yaml");

    let log = RecordingLog::new();
    let conversion = convert_file(
        &input,
        &output,
        &ConvertOptions::default(),
        Some(&StrictConverter::new()),
        &log,
    )
    .unwrap();

    assert!(conversion.used_fallback);
    assert_eq!(conversion.enhanced_count, 1);
    assert!(log.warnings()[0].contains("fallback"));

    let document = OpenApiParser::from_file(&output).unwrap().into_document();
    assert_eq!(document.servers[0].url, "https://api.example.com");
    let get = document.paths["/users/{id}"].operation("get").unwrap();
    assert_eq!(get.tags, vec!["Users"]);
    assert_eq!(
        get.responses["201"].content["application/json"].example,
        Some(json!({"id": 5}))
    );
    let id = get.parameters[0].as_parameter().unwrap();
    assert_eq!(id.name, "id");
    assert!(id.required);
}

#[test]
fn test_fallback_only_with_info_override() {
    let dir = TempDir::new().unwrap();
    let input = write_collection(&dir, "shop.json", SHOP);
    let output = dir.path().join("openapi.yaml");

    let options = ConvertOptions::default()
        .with_default_tag("Misc")
        .with_info(InfoOverride {
            title: Some("Shop Public API".to_string()),
            version: Some("2.0.0".to_string()),
            ..Default::default()
        });
    let conversion = convert_file(&input, &output, &options, None, &SilentLog).unwrap();

    assert!(conversion.used_fallback);
    let document = &conversion.document;
    assert_eq!(document.info.title, "Shop Public API");
    assert_eq!(document.info.version, "2.0.0");
    assert_eq!(document.info.description.as_deref(), Some("Shop API"));
    assert_eq!(
        document.paths["/health"].operation("get").unwrap().tags,
        vec!["Misc"]
    );
}

#[test]
fn test_utf16_collection_converts() {
    let dir = TempDir::new().unwrap();
    let mut bytes = vec![0xFF, 0xFE];
    for unit in SHOP.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let input = dir.path().join("shop-utf16.json");
    fs::write(&input, bytes).unwrap();
    let output = dir.path().join("openapi.yaml");

    let conversion =
        convert_file(&input, &output, &ConvertOptions::default(), None, &SilentLog).unwrap();
    assert_eq!(conversion.document.info.title, "Shop");
    assert_eq!(conversion.enhanced_count, 2);
}

#[test]
fn test_invalid_collection_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = write_collection(&dir, "broken.json", "{ not json");
    let output = dir.path().join("openapi.yaml");

    let result = convert_file(&input, &output, &ConvertOptions::default(), None, &SilentLog);
    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_inject_file_enriches_in_place() {
    let dir = TempDir::new().unwrap();
    let collection = write_collection(&dir, "shop.json", SHOP);
    let openapi = dir.path().join("openapi.yaml");
    fs::write(
        &openapi,
        r#"openapi: 3.0.0
info:
  title: Generated
  version: 0.0.1
servers:
  - url: "{{baseUrl}}"
paths:
  /users:
    post:
      responses:
        '200':
          description: OK
"#,
    )
    .unwrap();

    let enhanced = inject_file(&collection, &openapi, &ConvertOptions::default(), &SilentLog).unwrap();
    assert_eq!(enhanced, 1);

    let document = OpenApiParser::from_file(&openapi).unwrap().into_document();
    assert_eq!(document.info.title, "Generated");
    assert_eq!(document.servers[0].url, "https://shop.io/v1");
    let post = document.paths["/users"].operation("post").unwrap();
    assert!(post.responses.contains_key("200"));
    assert_eq!(
        post.responses["201"].content["application/json"].example,
        Some(json!({"id": 6}))
    );
    assert!(!document.paths.contains_key("/users/{id}"));

    // a second pass leaves the file unchanged
    let first = fs::read_to_string(&openapi).unwrap();
    inject_file(&collection, &openapi, &ConvertOptions::default(), &SilentLog).unwrap();
    assert_eq!(first, fs::read_to_string(&openapi).unwrap());
}
