use crate::violation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;

static COLON_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/:([A-Za-z_][A-Za-z0-9_]*)").expect("colon variable pattern"));

/// Rewrites framework-style `:id` variables to Swagger `{id}` syntax
pub fn normalize_path_syntax(path: &str) -> Cow<'_, str> {
    COLON_VARIABLE.replace_all(path, "/{$1}")
}

/// Prefixes a template with the document base path
pub fn join_base_path(base_path: &str, template: &str) -> String {
    let base = base_path.trim_end_matches('/');
    if template.starts_with('/') {
        format!("{}{}", base, template)
    } else {
        format!("{}/{}", base, template)
    }
}

/// Drops the query string and fragment of a URL
pub fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// Parses the query string of `url`. Repeated keys collect into an array.
pub fn parse_query_string(url: &str) -> Map<String, Value> {
    let Some((_, query)) = url.split_once('?') else {
        return Map::new();
    };
    let query = query.split('#').next().unwrap_or(query);

    let mut params = Map::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = Value::String(value.into_owned());
        match params.get_mut(key.as_ref()) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                params.insert(key.into_owned(), value);
            }
        }
    }
    params
}

/// Default rejection body: `Error: <message>` entries joined by commas,
/// newline terminated.
pub fn render_errors(errors: &[ValidationError]) -> String {
    let rendered: Vec<String> = errors
        .iter()
        .map(|e| format!("Error: {}", e.message()))
        .collect();
    format!("{}\n", rendered.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn normalizes_colon_variables() {
        assert_eq!(
            normalize_path_syntax("/users/:userId/posts/:post_id"),
            "/users/{userId}/posts/{post_id}"
        );
        assert_eq!(normalize_path_syntax("/users/{id}"), "/users/{id}");
        assert_eq!(normalize_path_syntax("/items:batchGet"), "/items:batchGet");
    }

    #[test]
    fn joins_base_paths() {
        assert_eq!(join_base_path("", "/users"), "/users");
        assert_eq!(join_base_path("/", "/users"), "/users");
        assert_eq!(join_base_path("/api/", "users"), "/api/users");
    }

    #[test]
    fn parses_query_strings() {
        let params = parse_query_string("/products?longitude=50&tag=a&tag=b%20c#top");
        assert_eq!(
            Value::Object(params),
            json!({ "longitude": "50", "tag": ["a", "b c"] })
        );
        assert!(parse_query_string("/products").is_empty());
    }

    #[test]
    fn renders_errors_for_the_default_response() {
        let errors = vec![
            ValidationError::not_specified("latitude"),
            ValidationError::type_mismatch("id"),
        ];
        assert_eq!(
            render_errors(&errors),
            "Error: Parameter : latitude is not specified.,Error: Parameter : id does not respect its type.\n"
        );
    }
}
