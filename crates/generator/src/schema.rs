//! Operation synthesis from a Postman request
//!
//! Every rule here is additive and infallible: anything that cannot be
//! understood degrades to the most generic valid schema.

use crate::url::{path_placeholders, query_params};
use indexmap::IndexMap;
use oasify_parser::openapi::{
    MediaType, Operation, Parameter, ParameterLocation, ParameterOrRef, RequestBody, Response,
    Schema,
};
use oasify_parser::postman::{Auth, AuthKind, Body, FormParam, Request, Variable};
use serde_json::Value;

/// Header used for API keys when the collection does not name one
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Example value for bearer `Authorization` headers
pub const BEARER_EXAMPLE: &str = "Bearer <token>";

/// Methods that get a `requestBody`
const BODY_METHODS: [&str; 3] = ["post", "put", "patch"];

/// Build the parameters, request body and default responses for a request
///
/// `path` is the normalized template; `auth` is the effective auth (the
/// request's own or an inherited one).
pub fn synthesize_operation(request: &Request, path: &str, auth: Option<&Auth>) -> Operation {
    let mut parameters = ParameterSet::default();

    for parameter in query_parameters(request) {
        parameters.push(parameter);
    }
    for parameter in path_parameters(path, request.url.variables()) {
        parameters.push(parameter);
    }
    for parameter in numeric_segment_parameters(path, &parameters) {
        parameters.push(parameter);
    }
    // auth first so its required header wins over a literal one
    if let Some(auth) = auth {
        for parameter in auth_parameters(auth) {
            parameters.push(parameter);
        }
    }
    for parameter in header_parameters(request) {
        parameters.push(parameter);
    }

    let method = request.method();
    let request_body = if BODY_METHODS.contains(&method.as_str()) {
        request.body.as_ref().and_then(request_body)
    } else {
        None
    };

    Operation {
        parameters: parameters.into_inner(),
        request_body,
        responses: default_responses(),
        ..Default::default()
    }
}

/// Parameters keyed by `(name, in)`; the first definition wins
#[derive(Debug, Default)]
struct ParameterSet {
    parameters: Vec<Parameter>,
}

impl ParameterSet {
    fn contains(&self, name: &str, location: ParameterLocation) -> bool {
        self.parameters.iter().any(|p| {
            p.location == location
                && if location == ParameterLocation::Header {
                    p.name.eq_ignore_ascii_case(name)
                } else {
                    p.name == name
                }
        })
    }

    fn contains_name(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    fn push(&mut self, parameter: Parameter) {
        if !self.contains(&parameter.name, parameter.location) {
            self.parameters.push(parameter);
        }
    }

    fn into_inner(self) -> Vec<ParameterOrRef> {
        self.parameters.into_iter().map(ParameterOrRef::from).collect()
    }
}

/// One optional string parameter per enabled query entry
fn query_parameters(request: &Request) -> Vec<Parameter> {
    query_params(&request.url)
        .into_iter()
        .filter(|q| !q.disabled)
        .filter_map(|q| {
            let key = q.key.filter(|k| !k.is_empty())?;
            let mut parameter = Parameter::string(&key, ParameterLocation::Query, false)
                .with_description(q.description.as_ref().and_then(|d| d.text()).map(String::from));
            if let Some(value) = q.value {
                parameter = parameter.with_example(value);
            }
            Some(parameter)
        })
        .collect()
}

/// One required parameter per `{name}` in the template
///
/// Path variables declared on the URL object supply examples and descriptions.
fn path_parameters(path: &str, declared: &[Variable]) -> Vec<Parameter> {
    path_placeholders(path)
        .into_iter()
        .map(|name| {
            let variable = declared
                .iter()
                .find(|v| v.key.as_deref() == Some(name.as_str()));
            let mut parameter = Parameter::string(&name, ParameterLocation::Path, true)
                .with_description(
                    variable
                        .and_then(|v| v.description.as_ref())
                        .and_then(|d| d.text())
                        .map(String::from),
                );
            if let Some(value) = variable
                .and_then(|v| v.value.as_deref())
                .filter(|v| !v.is_empty())
            {
                parameter = parameter.with_example(value);
            }
            parameter
        })
        .collect()
}

/// Literal numeric segments treated as ids: `id`, `id2`, `id3`, ...
///
/// Names already used by another parameter are skipped to the next free one.
fn numeric_segment_parameters(path: &str, existing: &ParameterSet) -> Vec<Parameter> {
    let mut inferred: Vec<Parameter> = Vec::new();
    let mut position = 1;

    for segment in path.split('/') {
        if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let name = loop {
            let candidate = if position == 1 {
                "id".to_string()
            } else {
                format!("id{}", position)
            };
            position += 1;
            if !existing.contains_name(&candidate) && !inferred.iter().any(|p| p.name == candidate) {
                break candidate;
            }
        };

        let example = segment
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(segment));
        inferred.push(Parameter::string(&name, ParameterLocation::Path, true).with_example(example));
    }

    inferred
}

/// One optional parameter per enabled header with both key and value
fn header_parameters(request: &Request) -> Vec<Parameter> {
    request
        .header
        .iter()
        .filter(|h| !h.disabled)
        .filter_map(|h| {
            let key = h.key.as_deref().filter(|k| !k.is_empty())?;
            let value = h.value.as_deref().filter(|v| !v.is_empty())?;
            Some(Parameter::string(key, ParameterLocation::Header, false).with_example(value))
        })
        .collect()
}

/// Required parameters implied by the auth scheme
fn auth_parameters(auth: &Auth) -> Vec<Parameter> {
    match auth.kind {
        AuthKind::Bearer => vec![
            Parameter::string("Authorization", ParameterLocation::Header, true)
                .with_example(BEARER_EXAMPLE),
        ],
        AuthKind::Basic => vec![
            Parameter::string("Authorization", ParameterLocation::Header, true)
                .with_example("Basic <credentials>"),
        ],
        AuthKind::ApiKey => {
            let name = auth.attribute("key").unwrap_or(DEFAULT_API_KEY_HEADER);
            let location = match auth.attribute("in") {
                Some(place) if place.eq_ignore_ascii_case("query") => ParameterLocation::Query,
                _ => ParameterLocation::Header,
            };
            vec![Parameter::string(name, location, true).with_example("<api-key>")]
        }
        AuthKind::NoAuth | AuthKind::Other(_) => Vec::new(),
    }
}

/// Request body schema for a Postman body
fn request_body(body: &Body) -> Option<RequestBody> {
    let (content_type, media) = match body {
        Body::Raw { text, language } => {
            if text.trim().is_empty() {
                return None;
            }
            raw_media(text, language.as_deref())
        }
        Body::FormData(fields) => ("multipart/form-data", form_media(fields)),
        Body::UrlEncoded(fields) => ("application/x-www-form-urlencoded", form_media(fields)),
        Body::Other(mode) if mode == "file" => (
            "application/octet-stream",
            MediaType {
                schema: Some(Schema {
                    format: Some("binary".to_string()),
                    ..Schema::of_type("string")
                }),
                ..Default::default()
            },
        ),
        Body::Other(_) => return None,
    };

    let mut content = IndexMap::new();
    content.insert(content_type.to_string(), media);
    Some(RequestBody {
        content,
        ..Default::default()
    })
}

fn raw_media(text: &str, language: Option<&str>) -> (&'static str, MediaType) {
    let text_type = match language {
        Some("xml") => Some("application/xml"),
        Some("html") => Some("text/html"),
        Some("text") => Some("text/plain"),
        Some("javascript") => Some("application/javascript"),
        _ => None,
    };
    if let Some(content_type) = text_type {
        return (
            content_type,
            MediaType {
                schema: Some(Schema::of_type("string")),
                example: Some(Value::String(text.to_string())),
                ..Default::default()
            },
        );
    }

    match serde_json::from_str::<Value>(text) {
        Ok(parsed) => (
            "application/json",
            MediaType {
                schema: Some(infer_schema(&parsed)),
                example: Some(parsed),
                ..Default::default()
            },
        ),
        Err(_) => (
            "application/json",
            MediaType {
                schema: Some(Schema::of_type("object")),
                example: Some(Value::String(text.to_string())),
                ..Default::default()
            },
        ),
    }
}

fn form_media(fields: &[FormParam]) -> MediaType {
    let mut schema = Schema::of_type("object");
    for field in fields.iter().filter(|f| !f.disabled) {
        let Some(key) = field.key.as_deref().filter(|k| !k.is_empty()) else {
            continue;
        };
        let is_file = field.param_type.as_deref() == Some("file");
        let property = if is_file {
            Schema {
                format: Some("binary".to_string()),
                ..Schema::of_type("string")
            }
        } else {
            let mut property = Schema::of_type("string");
            property.example = field.value.clone().map(Value::String);
            property.description = field
                .description
                .as_ref()
                .and_then(|d| d.text())
                .map(String::from);
            property
        };
        schema.properties.insert(key.to_string(), property);
    }

    MediaType {
        schema: Some(schema),
        ..Default::default()
    }
}

/// Schema describing a JSON example value
///
/// Scalars carry their literal value as `example`; objects and arrays are
/// described structurally, arrays from their first element.
pub fn infer_schema(value: &Value) -> Schema {
    match value {
        Value::Object(map) => {
            let mut schema = Schema::of_type("object");
            for (key, field) in map {
                schema.properties.insert(key.clone(), infer_schema(field));
            }
            schema
        }
        Value::Array(items) => {
            let mut schema = Schema::of_type("array");
            schema.items = Some(Box::new(
                items
                    .first()
                    .map(infer_schema)
                    .unwrap_or_else(|| Schema::of_type("string")),
            ));
            schema
        }
        Value::Number(_) => Schema::of_type("number").with_example(value.clone()),
        Value::Bool(_) => Schema::of_type("boolean").with_example(value.clone()),
        Value::String(_) => Schema::of_type("string").with_example(value.clone()),
        Value::Null => Schema::of_type("string"),
    }
}

/// Placeholder `200` response, replaced when an example is injected
pub fn default_responses() -> IndexMap<String, Response> {
    let mut content = IndexMap::new();
    content.insert(
        "application/json".to_string(),
        MediaType {
            schema: Some(Schema::of_type("object")),
            ..Default::default()
        },
    );

    let mut responses = IndexMap::new();
    responses.insert(
        "200".to_string(),
        Response {
            description: Some("Successful response".to_string()),
            content,
            ..Default::default()
        },
    );
    responses
}
