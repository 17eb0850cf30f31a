use crate::error::SpecError;
use crate::validation_helpers::{join_base_path, strip_query};
use indexmap::IndexMap;
use matchit::Router;
use std::fmt;

/// A declared path template compiled into a matcher.
///
/// Concrete URLs are matched with the document base path prepended, with
/// or without a trailing slash. Each `{variable}` matches one non-empty
/// segment.
pub struct PathTemplate {
    raw: String,
    variable_names: Vec<String>,
    router: Router<()>,
}

impl PathTemplate {
    pub fn compile(raw: &str, base_path: &str) -> Result<Self, SpecError> {
        let route = join_base_path(base_path, raw);
        let invalid = |e: matchit::InsertError| SpecError::InvalidPathTemplate {
            template: raw.to_string(),
            reason: e.to_string(),
        };

        let mut router = Router::new();
        router.insert(route.clone(), ()).map_err(invalid)?;
        if !route.ends_with('/') {
            router.insert(format!("{}/", route), ()).map_err(invalid)?;
        }

        Ok(Self {
            raw: raw.to_string(),
            variable_names: variable_names(raw),
            router,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Variable names in placeholder order
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    pub fn matches(&self, url: &str) -> bool {
        self.router.at(strip_query(url)).is_ok()
    }

    /// Captured variables, or `None` when `url` does not match
    pub fn captures(&self, url: &str) -> Option<IndexMap<String, String>> {
        let matched = self.router.at(strip_query(url)).ok()?;

        Some(
            self.variable_names
                .iter()
                .zip(matched.params.iter())
                .map(|(name, (_, value))| (name.clone(), value.to_string()))
                .collect(),
        )
    }
}

impl fmt::Debug for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathTemplate")
            .field("raw", &self.raw)
            .field("variable_names", &self.variable_names)
            .finish()
    }
}

fn variable_names(template: &str) -> Vec<String> {
    template
        .split('{')
        .skip(1)
        .filter_map(|part| part.split_once('}').map(|(name, _)| name.to_string()))
        .collect()
}

/// Every declared path template of a document, compiled once
#[derive(Debug)]
pub struct PathMatcherRegistry {
    templates: Vec<PathTemplate>,
}

impl PathMatcherRegistry {
    pub fn compile<'a>(
        templates: impl IntoIterator<Item = &'a str>,
        base_path: &str,
    ) -> Result<Self, SpecError> {
        let templates = templates
            .into_iter()
            .map(|raw| PathTemplate::compile(raw, base_path))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("Compiled {} path template(s)", templates.len());
        Ok(Self { templates })
    }

    pub fn get(&self, raw: &str) -> Option<&PathTemplate> {
        self.templates.iter().find(|t| t.raw == raw)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Finds the single template matching `url`.
    ///
    /// More than one match means the document's paths overlap, which is
    /// reported as [`SpecError::AmbiguousRoute`].
    pub fn find_template(&self, url: &str) -> Result<Option<&PathTemplate>, SpecError> {
        let matched: Vec<&PathTemplate> =
            self.templates.iter().filter(|t| t.matches(url)).collect();

        match matched.as_slice() {
            [] => Ok(None),
            [template] => Ok(Some(template)),
            _ => Err(SpecError::AmbiguousRoute {
                url: url.to_string(),
                templates: matched.iter().map(|t| t.raw.clone()).collect(),
            }),
        }
    }

    /// Path variables of `url` for an already matched `template`
    pub fn extract_variables(
        &self,
        url: &str,
        template: &PathTemplate,
    ) -> IndexMap<String, String> {
        template.captures(url).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest(
        url,
        expected,
        case("/api/users/42", true),
        case("/api/users/42/", true),
        case("/api/users/42?expand=true", true),
        case("/api/users/", false),
        case("/users/42", false),
        case("/api/users/42/posts", false)
    )]
    fn matches_concrete_urls(url: &str, expected: bool) {
        let template = PathTemplate::compile("/users/{id}", "/api").unwrap();
        assert_eq!(template.matches(url), expected);
    }

    #[test]
    fn records_variables_in_placeholder_order() {
        let template = PathTemplate::compile("/users/{userId}/posts/{postId}", "").unwrap();
        assert_eq!(template.variable_names(), &["userId", "postId"]);

        let captures = template.captures("/users/john/posts/7?x=1").unwrap();
        let pairs: Vec<_> = captures.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("userId", "john"), ("postId", "7")]);
    }

    #[test]
    fn finds_the_matching_template() {
        let registry =
            PathMatcherRegistry::compile(["/products", "/users/{id}"], "/v1/").unwrap();

        let template = registry.find_template("/v1/users/12").unwrap().unwrap();
        assert_eq!(template.raw(), "/users/{id}");
        assert_eq!(
            registry.extract_variables("/v1/users/12", template)["id"],
            "12"
        );
        assert!(registry.find_template("/v1/orders").unwrap().is_none());
    }

    #[test]
    fn overlapping_templates_are_ambiguous() {
        let registry = PathMatcherRegistry::compile(["/users/{id}", "/users/me"], "").unwrap();

        match registry.find_template("/users/me") {
            Err(SpecError::AmbiguousRoute { templates, .. }) => {
                assert_eq!(templates, vec!["/users/{id}", "/users/me"]);
            }
            other => panic!("expected an ambiguous route, got {other:?}"),
        }
        assert!(registry.find_template("/users/7").unwrap().is_some());
    }
}
