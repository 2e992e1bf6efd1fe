//! Endpoint extraction: source text to [`EndpointRef`]s.
//!
//! Applies an ecosystem's registered endpoint patterns to one file's
//! content. Paths are taken literally from source, normalized only to a
//! single leading slash. Placeholder syntaxes (`{id}`, `:id`, `<id>`)
//! stay distinct unless placeholder normalization is enabled.

use std::sync::OnceLock;

use regex::Regex;

use crate::registry::CompiledProfile;
use crate::snapshot::EndpointRef;

/// Verb recorded when a pattern cannot determine one syntactically.
const DEFAULT_METHOD: &str = "GET";

/// Extracts endpoint declarations from one file's content using the
/// given ecosystem profile.
#[must_use]
pub fn endpoints_in_content(
    content: &str,
    profile: &CompiledProfile,
    file: &str,
    normalize_placeholders: bool,
) -> Vec<EndpointRef> {
    let mut endpoints = Vec::new();
    for pattern in &profile.endpoints {
        for caps in pattern.regex.captures_iter(content) {
            let Some(raw) = caps.get(1) else {
                continue;
            };
            let mut path = canonical_path(raw.as_str());
            if normalize_placeholders {
                path = normalize_path_placeholders(&path);
            }
            endpoints.push(EndpointRef {
                method: pattern.method.unwrap_or(DEFAULT_METHOD).to_string(),
                path,
                file: file.to_string(),
            });
        }
    }
    endpoints
}

/// Collapses a raw path literal to a single leading slash.
fn canonical_path(raw: &str) -> String {
    format!("/{}", raw.trim().trim_matches('/'))
}

/// Rewrites `{id}`, `:id`, and `<id>` placeholder segments to the
/// canonical `{param}` token so differing framework syntaxes compare
/// equal. Opt-in; identity is otherwise computed on the literal text.
#[must_use]
pub fn normalize_path_placeholders(path: &str) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder = PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{[^}/]*\}|<[^>/]*>|:[A-Za-z_][A-Za-z0-9_]*").expect("static pattern")
    });
    placeholder.replace_all(path, "{param}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{profile, Ecosystem};

    #[test]
    fn express_routes_yield_method_and_path() {
        let content = "app.get('/users', list);\nrouter.post('/users', create);\n";
        let eps = endpoints_in_content(content, profile(Ecosystem::Node), "routes.js", false);
        let items: Vec<String> = eps.iter().map(ToString::to_string).collect();
        assert!(items.contains(&"GET /users".to_string()));
        assert!(items.contains(&"POST /users".to_string()));
    }

    #[test]
    fn verbless_request_mapping_defaults_to_get() {
        let content = r#"@RequestMapping("/health")"#;
        let eps = endpoints_in_content(content, profile(Ecosystem::Maven), "C.java", false);
        assert_eq!(eps.len(), 1);
        assert_eq!(eps[0].method, "GET");
        assert_eq!(eps[0].path, "/health");
    }

    #[test]
    fn paths_get_a_single_leading_slash() {
        let content = "app.get('users/', list);";
        let eps = endpoints_in_content(content, profile(Ecosystem::Node), "r.js", false);
        assert_eq!(eps[0].path, "/users");
    }

    #[test]
    fn placeholder_syntaxes_stay_distinct_by_default() {
        assert_ne!(
            canonical_path("/users/{id}"),
            canonical_path("/users/:id"),
        );
    }

    #[test]
    fn normalization_unifies_placeholder_syntaxes() {
        assert_eq!(normalize_path_placeholders("/users/{id}"), "/users/{param}");
        assert_eq!(normalize_path_placeholders("/users/:id"), "/users/{param}");
        assert_eq!(normalize_path_placeholders("/users/<id>"), "/users/{param}");
    }
}
