//! Collection variable resolution
//!
//! Postman collections reference their base URL through `{{baseUrl}}`-style
//! placeholders. The map is built once per run from the collection's
//! `variable` array and is read-only afterwards.

use indexmap::IndexMap;
use oasify_parser::postman::Collection;
use regex::Regex;
use std::sync::OnceLock;

/// Origin used when the collection declares no base URL
pub const DEFAULT_BASE_URL: &str = "https://api.example.com";

/// Variable names that denote the API base URL, lower-cased
pub const BASE_URL_VARIABLES: [&str; 3] = ["baseurl", "base_url", "url"];

/// `{{name}}` placeholder; group 1 is the trimmed name
pub(crate) fn template_token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("valid token regex"))
}

fn doubled_scheme() -> &'static Regex {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    SCHEME.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://([A-Za-z][A-Za-z0-9+.-]*://)")
            .expect("valid scheme regex")
    })
}

/// Case-insensitive collection variable lookup
#[derive(Debug, Clone, Default)]
pub struct VariableMap {
    values: IndexMap<String, String>,
}

impl VariableMap {
    /// Build the map from the collection's top-level variables
    ///
    /// Disabled variables and variables without a key are ignored. When a key
    /// repeats, the last definition wins.
    pub fn from_collection(collection: &Collection) -> Self {
        let values = collection
            .variable
            .iter()
            .filter(|v| !v.disabled)
            .filter_map(|v| {
                let key = v.key.as_deref()?.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_lowercase(), v.value.clone().unwrap_or_default()))
            })
            .collect();

        Self { values }
    }

    /// Build a map from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_lowercase(), v.into()))
                .collect(),
        }
    }

    /// Variable value by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&name.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace every `{{key}}` whose key is defined; unknown tokens stay
    pub fn substitute(&self, text: &str) -> String {
        template_token()
            .replace_all(text, |caps: &regex::Captures| match self.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Base URL from `baseUrl`, then `base_url`, then [`DEFAULT_BASE_URL`]
    ///
    /// Placeholders inside the value are substituted once; a trailing slash is
    /// dropped.
    pub fn base_url(&self) -> String {
        let base = ["baseurl", "base_url"]
            .iter()
            .find_map(|name| self.get(name).filter(|v| !v.trim().is_empty()))
            .map(|value| self.substitute(value.trim()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        base.trim_end_matches('/').to_string()
    }

    /// Base URL usable as `servers[].url`
    ///
    /// Falls back to [`DEFAULT_BASE_URL`] while the value still holds a
    /// placeholder, and adds `https://` to bare host names.
    pub fn server_url(&self) -> String {
        let base = self.base_url();
        if has_template(&base) {
            return DEFAULT_BASE_URL.to_string();
        }
        if base.contains("://") {
            base
        } else {
            format!("https://{}", base)
        }
    }

    /// Resolve a templated server URL against the collection variables
    ///
    /// Returns `None` when `existing` holds no placeholder (nothing to do), when
    /// the base URL itself is unresolved, or when any placeholder survives
    /// substitution; the caller then keeps the original URL.
    pub fn resolve_server_url(&self, existing: &str) -> Option<String> {
        if !has_template(existing) {
            return None;
        }

        let base = self.base_url();
        if has_template(&base) {
            return None;
        }

        let with_base = template_token().replace_all(existing, |caps: &regex::Captures| {
            if is_base_url_variable(&caps[1]) {
                base.clone()
            } else {
                caps[0].to_string()
            }
        });
        let resolved = self.substitute(&with_base);
        if has_template(&resolved) {
            return None;
        }

        // `https://{{baseUrl}}` with a base that already has a scheme
        let resolved = doubled_scheme().replace(&resolved, "$1").into_owned();
        Some(resolved.trim_end_matches('/').to_string())
    }
}

/// True when `text` contains a `{{...}}` placeholder
pub fn has_template(text: &str) -> bool {
    template_token().is_match(text)
}

/// True for `baseUrl`, `base_url` and `url` (any case)
pub fn is_base_url_variable(name: &str) -> bool {
    BASE_URL_VARIABLES.contains(&name.trim().to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasify_parser::postman::CollectionParser;

    #[test]
    fn test_keys_are_case_insensitive() {
        let collection = CollectionParser::from_json(
            r#"{"variable": [{"key": "BaseURL", "value": "https://a.io"}, {"key": "off", "value": "x", "disabled": true}]}"#,
        )
        .unwrap()
        .into_collection();

        let vars = VariableMap::from_collection(&collection);
        assert_eq!(vars.get("baseurl"), Some("https://a.io"));
        assert_eq!(vars.get("BASEURL"), Some("https://a.io"));
        assert!(!vars.contains("off"));
    }

    #[test]
    fn test_base_url_priority() {
        let both = VariableMap::from_pairs([("base_url", "https://b.io"), ("baseUrl", "https://a.io/")]);
        assert_eq!(both.base_url(), "https://a.io");

        let snake = VariableMap::from_pairs([("base_url", "https://b.io")]);
        assert_eq!(snake.base_url(), "https://b.io");

        assert_eq!(VariableMap::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_server_url_adds_scheme() {
        let vars = VariableMap::from_pairs([("baseUrl", "api.example.com")]);
        assert_eq!(vars.server_url(), "https://api.example.com");

        let nested = VariableMap::from_pairs([("baseUrl", "{{host}}/v1"), ("host", "http://h.io")]);
        assert_eq!(nested.server_url(), "http://h.io/v1");

        let unresolved = VariableMap::from_pairs([("baseUrl", "{{missing}}/v1")]);
        assert_eq!(unresolved.server_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_resolve_server_url() {
        let vars = VariableMap::from_pairs([("baseUrl", "api.example.com")]);
        assert_eq!(
            vars.resolve_server_url("https://{{baseUrl}}/"),
            Some("https://api.example.com".to_string())
        );
    }

    #[test]
    fn test_resolve_server_url_collapses_scheme() {
        let vars = VariableMap::from_pairs([("baseUrl", "https://api.example.com")]);
        assert_eq!(
            vars.resolve_server_url("https://{{baseUrl}}"),
            Some("https://api.example.com".to_string())
        );
    }

    #[test]
    fn test_resolve_server_url_substitutes_other_variables() {
        let vars = VariableMap::from_pairs([("baseUrl", "https://api.io"), ("version", "v2")]);
        assert_eq!(
            vars.resolve_server_url("{{baseUrl}}/{{version}}"),
            Some("https://api.io/v2".to_string())
        );
    }

    #[test]
    fn test_resolve_server_url_keeps_unresolved() {
        let vars = VariableMap::from_pairs([("baseUrl", "https://api.io")]);
        assert_eq!(vars.resolve_server_url("{{baseUrl}}/{{tenant}}"), None);
        assert_eq!(vars.resolve_server_url("https://fixed.io"), None);
    }
}
