//! Postman Collection v2.x type definitions
//!
//! Postman collections are hand-edited and exported by several tool versions,
//! so many fields come in more than one shape. Each loose shape is decoded
//! through a private `Raw*` type and resolved once into a tagged enum.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Collection root
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Collection {
    /// Collection metadata
    #[serde(default)]
    pub info: CollectionInfo,

    /// Top-level items (folders and requests)
    #[serde(default, deserialize_with = "lenient_vec")]
    pub item: Vec<Item>,

    /// Collection variables (`{{baseUrl}}` and friends)
    #[serde(default, deserialize_with = "lenient_vec")]
    pub variable: Vec<Variable>,

    /// Collection-wide auth, inherited by requests without their own
    #[serde(default)]
    pub auth: Option<Auth>,
}

/// Collection metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionInfo {
    /// Collection name
    #[serde(default)]
    pub name: Option<String>,

    /// Collection description
    #[serde(default)]
    pub description: Option<Description>,
}

/// Description, either plain text or `{content, type}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Rich {
        #[serde(default)]
        content: Option<String>,
    },
}

impl Description {
    /// Text content, if any
    pub fn text(&self) -> Option<&str> {
        let text = match self {
            Description::Text(text) => Some(text.as_str()),
            Description::Rich { content } => content.as_deref(),
        };
        text.filter(|t| !t.trim().is_empty())
    }
}

/// Collection variable
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Variable {
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,

    #[serde(default)]
    pub description: Option<Description>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub disabled: bool,
}

/// Collection tree node
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawItem")]
pub enum Item {
    /// Folder with at least one child
    Folder(Folder),

    /// Request with its saved examples
    Request(RequestItem),
}

/// Folder node
#[derive(Debug, Clone)]
pub struct Folder {
    pub name: String,
    pub description: Option<Description>,
    pub items: Vec<Item>,
    pub auth: Option<Auth>,
}

/// Request leaf
#[derive(Debug, Clone)]
pub struct RequestItem {
    pub name: String,

    /// `None` for empty folders and other nodes without a request
    pub request: Option<Request>,

    /// Saved example responses, in document order
    pub examples: Vec<Example>,
}

impl RequestItem {
    /// First saved example; later ones are ignored
    pub fn first_example(&self) -> Option<&Example> {
        self.examples.first()
    }
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Folder(folder) => &folder.name,
            Item::Request(request) => &request.name,
        }
    }
}

#[derive(Deserialize)]
struct RawItem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<Description>,
    #[serde(default)]
    item: Option<Vec<Item>>,
    #[serde(default)]
    request: Option<Request>,
    #[serde(default, deserialize_with = "lenient_vec")]
    response: Vec<Example>,
    #[serde(default)]
    auth: Option<Auth>,
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        let name = raw.name.unwrap_or_default();
        match raw.item {
            Some(items) if !items.is_empty() => Item::Folder(Folder {
                name,
                description: raw.description,
                items,
                auth: raw.auth,
            }),
            _ => Item::Request(RequestItem {
                name,
                request: raw.request,
                examples: raw.response,
            }),
        }
    }
}

/// HTTP request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawRequest")]
pub struct Request {
    /// HTTP method as written in the collection
    pub method: String,
    pub url: Url,
    pub header: Vec<Header>,
    pub body: Option<Body>,
    pub auth: Option<Auth>,
    pub description: Option<Description>,
}

impl Request {
    /// Lower-case method, `get` when absent
    pub fn method(&self) -> String {
        if self.method.trim().is_empty() {
            "get".to_string()
        } else {
            self.method.trim().to_lowercase()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRequest {
    Url(String),
    Full(RequestFields),
}

#[derive(Deserialize)]
struct RequestFields {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    url: Option<Url>,
    #[serde(default, deserialize_with = "header_list")]
    header: Vec<Header>,
    #[serde(default)]
    body: Option<Body>,
    #[serde(default)]
    auth: Option<Auth>,
    #[serde(default)]
    description: Option<Description>,
}

impl From<RawRequest> for Request {
    fn from(raw: RawRequest) -> Self {
        match raw {
            RawRequest::Url(url) => Request {
                method: "GET".to_string(),
                url: Url::Bare(url),
                ..Default::default()
            },
            RawRequest::Full(fields) => Request {
                method: fields.method.unwrap_or_default(),
                url: fields.url.unwrap_or_default(),
                header: fields.header,
                body: fields.body,
                auth: fields.auth,
                description: fields.description,
            },
        }
    }
}

/// Request header
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Header {
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub disabled: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawHeaders {
    List(Vec<Header>),
    Text(String),
}

/// Headers are either a list or a `Key: Value` block (v2.0 exports)
fn header_list<'de, D>(deserializer: D) -> Result<Vec<Header>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawHeaders>::deserialize(deserializer)?;
    Ok(match raw {
        None => Vec::new(),
        Some(RawHeaders::List(headers)) => headers,
        Some(RawHeaders::Text(text)) => text
            .lines()
            .filter_map(|line| {
                let (key, value) = line.split_once(':')?;
                Some(Header {
                    key: Some(key.trim().to_string()),
                    value: Some(value.trim().to_string()),
                    disabled: false,
                })
            })
            .collect(),
    })
}

/// URL shape
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawUrl")]
pub enum Url {
    /// Plain string, absolute URL or bare path
    Bare(String),

    /// Object carrying a `path`
    Structured(StructuredUrl),

    /// Object carrying only a `raw` string with `{{variable}}` placeholders
    Template(TemplateUrl),
}

impl Default for Url {
    fn default() -> Self {
        Url::Bare(String::new())
    }
}

/// URL object with explicit path segments
#[derive(Debug, Clone, Default)]
pub struct StructuredUrl {
    pub raw: Option<String>,
    pub path: Vec<String>,
    pub query: Vec<QueryParam>,
    pub variable: Vec<Variable>,
}

/// URL object with only a raw template
#[derive(Debug, Clone, Default)]
pub struct TemplateUrl {
    pub raw: String,
    pub query: Vec<QueryParam>,
    pub variable: Vec<Variable>,
}

impl Url {
    /// Explicit query entries, when the URL is an object that lists them
    pub fn query(&self) -> Option<&[QueryParam]> {
        match self {
            Url::Bare(_) => None,
            Url::Structured(url) => Some(&url.query),
            Url::Template(url) => Some(&url.query),
        }
    }

    /// Path variables declared on the URL object
    pub fn variables(&self) -> &[Variable] {
        match self {
            Url::Bare(_) => &[],
            Url::Structured(url) => &url.variable,
            Url::Template(url) => &url.variable,
        }
    }

    /// The raw URL string, if the shape carries one
    pub fn raw(&self) -> Option<&str> {
        match self {
            Url::Bare(raw) => Some(raw),
            Url::Structured(url) => url.raw.as_deref(),
            Url::Template(url) => Some(&url.raw),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUrl {
    Bare(String),
    Object(UrlFields),
}

#[derive(Deserialize)]
struct UrlFields {
    #[serde(default)]
    raw: Option<String>,
    #[serde(default)]
    path: Option<RawPath>,
    #[serde(default, deserialize_with = "lenient_vec")]
    query: Vec<QueryParam>,
    #[serde(default, deserialize_with = "lenient_vec")]
    variable: Vec<Variable>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPath {
    Segments(Vec<PathSegment>),
    Single(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PathSegment {
    Text(String),
    Object {
        #[serde(default)]
        value: Option<String>,
    },
}

impl From<RawUrl> for Url {
    fn from(raw: RawUrl) -> Self {
        let fields = match raw {
            RawUrl::Bare(url) => return Url::Bare(url),
            RawUrl::Object(fields) => fields,
        };

        match (fields.path, fields.raw) {
            (Some(path), raw) => {
                let path = match path {
                    RawPath::Single(segment) => vec![segment],
                    RawPath::Segments(segments) => segments
                        .into_iter()
                        .map(|segment| match segment {
                            PathSegment::Text(text) => text,
                            PathSegment::Object { value } => value.unwrap_or_default(),
                        })
                        .collect(),
                };
                Url::Structured(StructuredUrl {
                    raw,
                    path,
                    query: fields.query,
                    variable: fields.variable,
                })
            }
            (None, Some(raw)) => Url::Template(TemplateUrl {
                raw,
                query: fields.query,
                variable: fields.variable,
            }),
            (None, None) => Url::Structured(StructuredUrl {
                raw: None,
                path: Vec::new(),
                query: fields.query,
                variable: fields.variable,
            }),
        }
    }
}

/// Query string entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParam {
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub disabled: bool,

    #[serde(default)]
    pub description: Option<Description>,
}

/// Request body, resolved from its `mode`
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawBody")]
pub enum Body {
    /// Raw text; `language` comes from `options.raw.language`
    Raw {
        text: String,
        language: Option<String>,
    },
    FormData(Vec<FormParam>),
    UrlEncoded(Vec<FormParam>),
    /// Modes without a schema mapping (`file`, `graphql`, ...)
    Other(String),
}

/// Form field
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormParam {
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,

    /// `text` or `file`
    #[serde(rename = "type", default)]
    pub param_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub disabled: bool,

    #[serde(default)]
    pub description: Option<Description>,
}

#[derive(Deserialize)]
struct RawBody {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    raw: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    formdata: Vec<FormParam>,
    #[serde(default, deserialize_with = "lenient_vec")]
    urlencoded: Vec<FormParam>,
    #[serde(default)]
    options: Option<Value>,
}

impl From<RawBody> for Body {
    fn from(raw: RawBody) -> Self {
        match raw.mode.as_deref().unwrap_or("raw") {
            "raw" => Body::Raw {
                text: raw.raw.unwrap_or_default(),
                language: raw
                    .options
                    .as_ref()
                    .and_then(|o| o.pointer("/raw/language"))
                    .and_then(Value::as_str)
                    .map(str::to_lowercase),
            },
            "formdata" => Body::FormData(raw.formdata),
            "urlencoded" => Body::UrlEncoded(raw.urlencoded),
            other => Body::Other(other.to_string()),
        }
    }
}

/// Authentication block
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawAuth")]
pub struct Auth {
    pub kind: AuthKind,

    /// Attributes of the block named after `type`, e.g. `bearer: [{key: token, ...}]`
    pub attributes: IndexMap<String, String>,
}

/// Authentication scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthKind {
    Bearer,
    ApiKey,
    Basic,
    NoAuth,
    Other(String),
}

impl Auth {
    /// Attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[derive(Deserialize)]
struct RawAuth {
    #[serde(rename = "type", default)]
    auth_type: Option<String>,
    #[serde(flatten)]
    blocks: IndexMap<String, Value>,
}

impl From<RawAuth> for Auth {
    fn from(raw: RawAuth) -> Self {
        let auth_type = raw.auth_type.unwrap_or_default().to_lowercase();
        let kind = match auth_type.as_str() {
            "bearer" => AuthKind::Bearer,
            "apikey" => AuthKind::ApiKey,
            "basic" => AuthKind::Basic,
            "noauth" => AuthKind::NoAuth,
            _ => AuthKind::Other(auth_type.clone()),
        };

        let mut attributes = IndexMap::new();
        match raw.blocks.get(&auth_type) {
            // v2.1: [{key, value, type}]
            Some(Value::Array(entries)) => {
                for entry in entries {
                    if let Some(key) = entry.get("key").and_then(Value::as_str) {
                        let value = entry.get("value").and_then(scalar_to_string);
                        attributes.insert(key.to_string(), value.unwrap_or_default());
                    }
                }
            }
            // v2.0: {key: value}
            Some(Value::Object(map)) => {
                for (key, value) in map {
                    if let Some(value) = scalar_to_string(value) {
                        attributes.insert(key.clone(), value);
                    }
                }
            }
            _ => {}
        }

        Auth { kind, attributes }
    }
}

/// Saved example response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Example {
    #[serde(default)]
    pub name: Option<String>,

    /// Numeric status code
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,

    /// Status text, e.g. `OK`
    #[serde(default)]
    pub status: Option<String>,

    /// Response body, usually JSON text
    #[serde(default)]
    pub body: Option<Value>,
}

impl Example {
    /// Status key for the `responses` map: `code`, then `status`, then `200`
    pub fn status_key(&self) -> String {
        if let Some(code) = self.code.as_deref().map(str::trim) {
            if !code.is_empty() && code != "0" {
                return code.to_string();
            }
        }
        match self.status.as_deref().map(str::trim) {
            Some(status) if !status.is_empty() => status.to_string(),
            _ => "200".to_string(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `null` reads as an empty list
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` reads as `false`
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Accepts strings, numbers and booleans; anything else becomes `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}
