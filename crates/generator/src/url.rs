//! URL normalization
//!
//! Turns any Postman URL shape into an OpenAPI path template:
//!
//! - `{{url}}/users/{{id}}`            → `/users/{id}`
//! - `https://api.io/users/:id?x=1`     → `/users/{id}`
//! - `{path: ["users", "{{id}}"]}`      → `/users/{id}`
//!
//! The result always starts with `/`.

use crate::variables::{is_base_url_variable, template_token, VariableMap};
use oasify_parser::postman::{QueryParam, Url};
use regex::Regex;
use std::sync::OnceLock;

/// Origin substituted for base URL placeholders before strict parsing
pub const PLACEHOLDER_ORIGIN: &str = "http://placeholder.local";

/// Normalized path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    /// Path starting with `/`, placeholders written `{name}`
    pub path: String,

    /// Strict URL parsing failed and the path was extracted heuristically
    pub best_effort: bool,
}

/// Normalize a request URL into a path template
pub fn normalize_path(url: &Url, variables: &VariableMap) -> PathTemplate {
    let (path, best_effort) = match url {
        Url::Bare(raw) => match strict_path(raw) {
            Some(path) => (path, false),
            None => bare_path(raw, variables),
        },
        Url::Structured(structured) => (structured.path.join("/"), false),
        Url::Template(template) => resolve_template(&template.raw, variables),
    };

    PathTemplate {
        path: canonicalize(&path),
        best_effort,
    }
}

/// Query entries of a URL
///
/// Object URLs list their query explicitly; for string URLs (or objects with
/// an empty list) the entries are read from the raw string's `?` part.
pub fn query_params(url: &Url) -> Vec<QueryParam> {
    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        return query.to_vec();
    }

    let Some(raw) = url.raw() else {
        return Vec::new();
    };
    let Some((_, query)) = raw.split_once('?') else {
        return Vec::new();
    };
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                return None;
            }
            Some(QueryParam {
                key: Some(key.to_string()),
                value: Some(value.to_string()),
                disabled: false,
                description: None,
            })
        })
        .collect()
}

/// Names of `{name}` placeholders in a path template, in order
pub fn path_placeholders(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| {
            let name = segment.strip_prefix('{')?.strip_suffix('}')?;
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// Path of an absolute URL, `None` unless the string parses as one
fn strict_path(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw.trim()).ok()?;
    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return None;
    }
    Some(decode_braces(parsed.path()))
}

/// Path of a bare string that is not an absolute URL
///
/// Only a leading base-URL (or defined) variable is taken as the origin and
/// dropped; any other leading placeholder is a path segment.
fn bare_path(raw: &str, variables: &VariableMap) -> (String, bool) {
    let raw = raw.trim();
    let origin = template_token()
        .captures(raw)
        .and_then(|caps| caps.get(0).zip(caps.get(1)))
        .filter(|(token, name)| {
            token.start() == 0
                && (is_base_url_variable(name.as_str()) || variables.contains(name.as_str()))
        })
        .map(|(token, _)| token.end());

    let (rest, best_effort) = match origin {
        Some(end) => (&raw[end..], false),
        None => (raw, true),
    };
    if rest.contains("://") {
        let path = after_authority()
            .captures(rest)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        return (path, true);
    }

    let path = rest.split(['?', '#']).next().unwrap_or_default().to_string();
    (path, best_effort)
}

/// Resolve a `{{...}}` template into a path
///
/// A leading base-URL placeholder becomes [`PLACEHOLDER_ORIGIN`], every other
/// placeholder becomes `{name}`; the result is parsed strictly. When that
/// fails the first `/...` segment is extracted, and as a last resort the whole
/// string is used.
fn resolve_template(raw: &str, variables: &VariableMap) -> (String, bool) {
    let raw = raw.trim();
    let mut leading = true;
    let substituted = template_token()
        .replace_all(raw, |caps: &regex::Captures| {
            let at_start = leading && caps.get(0).map(|m| m.start()) == Some(0);
            leading = false;
            let name = &caps[1];
            if at_start && (is_base_url_variable(name) || variables.contains(name)) {
                PLACEHOLDER_ORIGIN.to_string()
            } else {
                format!("{{{}}}", name)
            }
        })
        .into_owned();

    if let Some(path) = strict_path(&substituted) {
        return (path, false);
    }

    if raw.starts_with("{{") || substituted.contains("://") {
        let path = after_authority()
            .captures(&substituted)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        return (path, true);
    }

    let path = substituted
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_string();
    (path, true)
}

/// Optional scheme and authority, then the path up to `?` or `#` in group 1
fn after_authority() -> &'static Regex {
    static AFTER_AUTHORITY: OnceLock<Regex> = OnceLock::new();
    AFTER_AUTHORITY.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.-]*://)?[^/?#]*(/[^?#]*)?")
            .expect("valid authority regex")
    })
}

/// `%7B`/`%7D` back to braces so placeholders survive strict parsing
fn decode_braces(path: &str) -> String {
    path.replace("%7B", "{")
        .replace("%7b", "{")
        .replace("%7D", "}")
        .replace("%7d", "}")
}

/// Final form: `{{x}}` and `:x` segments become `{x}`, leading `/` enforced
fn canonicalize(path: &str) -> String {
    let path = template_token().replace_all(path, "{$1}");
    let segments: Vec<String> = path
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) if !name.is_empty() => format!("{{{}}}", name),
            _ => segment.to_string(),
        })
        .collect();
    let joined = segments.join("/");

    if joined.starts_with('/') {
        joined
    } else {
        format!("/{}", joined)
    }
}
