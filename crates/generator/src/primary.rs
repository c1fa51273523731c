//! Primary conversion
//!
//! The primary converter produces the baseline document. It is allowed to
//! refuse a collection; the pipeline then switches to [`crate::synthesize`].

use crate::fallback::{build_operation, collection_info};
use crate::url::normalize_path;
use crate::variables::{template_token, VariableMap};
use crate::walker::walk;
use oasify_common::{ConverterError, ConvertOptions, Result};
use oasify_parser::openapi::{OpenApiDocument, Server};
use oasify_parser::postman::Collection;

/// Produces a baseline OpenAPI document from a collection
#[cfg_attr(test, mockall::automock)]
pub trait PrimaryConverter {
    /// Convert the collection, or fail if it cannot be converted faithfully
    fn convert(&self, collection: &Collection, options: &ConvertOptions)
        -> Result<OpenApiDocument>;
}

/// Strict converter
///
/// Resolves collection variables in every request URL and requires the
/// result to be an absolute `http(s)` URL. Path variables (`{{id}}`, `:id`)
/// may stay unresolved; an unknown variable in the host, a relative URL or any
/// other unparseable URL makes the whole conversion fail.
///
/// Servers are the distinct base URLs the requests resolve against, in
/// document order.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictConverter;

impl StrictConverter {
    pub fn new() -> Self {
        Self
    }
}

impl PrimaryConverter for StrictConverter {
    fn convert(
        &self,
        collection: &Collection,
        options: &ConvertOptions,
    ) -> Result<OpenApiDocument> {
        let variables = VariableMap::from_collection(collection);
        let mut document = OpenApiDocument::new(collection_info(collection));
        let mut failures = Vec::new();

        walk(collection, |leaf| {
            let base = match leaf.request.url.raw() {
                Some(raw) => match resolve_base(raw, &variables) {
                    Ok(base) => Some(base),
                    Err(reason) => {
                        failures.push(format!("{} ({})", leaf.name(), reason));
                        return;
                    }
                },
                // structured URL without a raw string: the path is authoritative
                None => None,
            };

            let method = leaf.request.method();
            let path = normalize_path(&leaf.request.url, &variables).path;
            let operation = build_operation(&leaf, &path, options);
            if !document
                .paths
                .entry(path)
                .or_default()
                .set_operation(&method, operation)
            {
                failures.push(format!(
                    "{} (unsupported method {})",
                    leaf.name(),
                    method.to_uppercase()
                ));
                return;
            }

            if let Some(base) = base {
                if !document.servers.iter().any(|s| s.url == base) {
                    document.servers.push(Server {
                        url: base,
                        ..Default::default()
                    });
                }
            }
        });

        if !failures.is_empty() {
            return Err(ConverterError::Conversion(format!(
                "{} request(s) could not be converted: {}",
                failures.len(),
                failures.join(", ")
            )));
        }

        Ok(document)
    }
}

/// Base URL a raw request URL resolves against
///
/// When the URL starts with a variable, the base is that variable's value;
/// otherwise it is the URL's origin.
fn resolve_base(raw: &str, variables: &VariableMap) -> std::result::Result<String, String> {
    let raw = raw.trim();
    let resolved = variables.substitute(raw);
    // path variables left over become OpenAPI placeholders
    let resolved = template_token().replace_all(&resolved, "{$1}");

    let parsed = url::Url::parse(&resolved).map_err(|e| format!("invalid URL {}: {}", raw, e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme in {}", raw));
    }
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| format!("missing host in {}", raw))?;
    if host.contains(['{', '}']) || host.contains("%7B") || host.contains("%7b") {
        return Err(format!("unresolved host in {}", raw));
    }

    let leading_variable = template_token()
        .captures(raw)
        .filter(|caps| caps.get(0).map(|m| m.start()) == Some(0))
        .and_then(|caps| variables.get(&caps[1]).map(String::from));

    Ok(match leading_variable {
        Some(value) => value.trim().trim_end_matches('/').to_string(),
        None => parsed.origin().ascii_serialization(),
    })
}
