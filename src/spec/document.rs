use crate::api_validator::HttpMethod;
use crate::error::SpecError;
use crate::validation_helpers::normalize_path_syntax;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::str::FromStr;

/// Where in the HTTP request a declared parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Query,
    Path,
    FormData,
    Body,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Path => "path",
            Self::FormData => "formData",
            Self::Body => "body",
        }
    }
}

impl FromStr for ParameterLocation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "path" => Ok(Self::Path),
            "formData" => Ok(Self::FormData),
            "body" => Ok(Self::Body),
            _ => Err(()),
        }
    }
}

/// Declared type of a string-carried (query, path, formData) parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Integer,
    Number,
    Boolean,
    String,
    Array,
}

impl FromStr for PrimitiveKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "string" => Ok(Self::String),
            "array" => Ok(Self::Array),
            _ => Err(()),
        }
    }
}

/// Leaf type of a body schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl FromStr for ScalarKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            _ => Err(()),
        }
    }
}

/// Compiled body schema. `Ref` targets are looked up lazily in the
/// document definitions, see [`SchemaDocument::dereference`].
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Ref(String),
    Object {
        properties: IndexMap<String, SchemaNode>,
        required: IndexSet<String>,
    },
    Array(Box<SchemaNode>),
    Scalar(ScalarKind),
    /// A schema shape the checker does not model (`allOf`, `{}`, `file`).
    /// No present value conforms to it.
    Unsupported(String),
}

/// One declared operation parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    /// `None` when the declared type is absent or not a supported primitive
    pub kind: Option<PrimitiveKind>,
    pub declared_type: Option<String>,
    pub format: Option<String>,
    pub schema: Option<SchemaNode>,
    pub enum_values: Option<Vec<String>>,
}

impl ParameterSpec {
    /// Name used in violation messages
    pub fn label(&self) -> &str {
        if self.location == ParameterLocation::Body && self.name.is_empty() {
            crate::violation::PAYLOAD_LABEL
        } else {
            &self.name
        }
    }
}

/// Parameters of every method declared on one path template
pub type OperationMap = HashMap<HttpMethod, Vec<ParameterSpec>>;

/// Immutable view of a Swagger 2.0 document, limited to what request
/// validation needs.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    pub(crate) base_path: String,
    pub(crate) operations: IndexMap<String, OperationMap>,
    pub(crate) definitions: IndexMap<String, SchemaNode>,
}

impl SchemaDocument {
    /// Loads a document from its JSON representation.
    ///
    /// Fails when the input is not an object, has no `paths` mapping or
    /// declares no operation at all.
    pub fn from_value(document: &serde_json::Value) -> Result<Self, SpecError> {
        let object = document.as_object().ok_or_else(|| {
            SpecError::InvalidDocument("document must be an object".to_string())
        })?;

        if !object.get("paths").is_some_and(|paths| paths.is_object()) {
            return Err(SpecError::InvalidDocument(
                "document has no `paths` mapping".to_string(),
            ));
        }

        let raw = serde_json::from_value(document.clone()).map_err(|e| {
            SpecError::InvalidDocument(format!("Failed to parse Swagger document: {}", e))
        })?;

        crate::spec::builder::build_schema_document(raw)
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Declared path templates, in document order
    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn definitions(&self) -> &IndexMap<String, SchemaNode> {
        &self.definitions
    }

    /// Returns the parameters declared for `method` on `path`.
    ///
    /// `path` may use either `{id}` or `:id` variable syntax.
    pub fn parameters(
        &self,
        method: HttpMethod,
        path: &str,
    ) -> Result<&[ParameterSpec], SpecError> {
        let template = normalize_path_syntax(path);

        self.operations
            .get(&*template)
            .and_then(|operations| operations.get(&method))
            .map(Vec::as_slice)
            .ok_or_else(|| SpecError::UnknownOperation {
                method: method.as_str().to_string(),
                path: template.into_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document() -> SchemaDocument {
        SchemaDocument::from_value(&json!({
            "swagger": "2.0",
            "paths": {
                "/users/{id}": {
                    "get": {
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "type": "integer" }
                        ]
                    },
                    "delete": {}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn rejects_non_object_documents() {
        let err = SchemaDocument::from_value(&json!(["paths"])).unwrap_err();
        assert!(matches!(err, SpecError::InvalidDocument(_)));
    }

    #[test]
    fn rejects_documents_without_paths() {
        let err = SchemaDocument::from_value(&json!({ "swagger": "2.0" })).unwrap_err();
        assert!(matches!(err, SpecError::InvalidDocument(_)));
    }

    #[test]
    fn rejects_documents_without_operations() {
        let err = SchemaDocument::from_value(&json!({ "paths": {} })).unwrap_err();
        assert!(matches!(err, SpecError::InvalidDocument(_)));
    }

    #[test]
    fn resolves_parameters_with_either_variable_syntax() {
        let document = document();
        let braces = document.parameters(HttpMethod::GET, "/users/{id}").unwrap();
        let colon = document.parameters(HttpMethod::GET, "/users/:id").unwrap();

        assert_eq!(braces, colon);
        assert_eq!(braces[0].name, "id");
        assert_eq!(braces[0].kind, Some(PrimitiveKind::Integer));
    }

    #[test]
    fn operations_without_parameters_resolve_to_an_empty_list() {
        let document = document();
        assert!(document
            .parameters(HttpMethod::DELETE, "/users/{id}")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn unknown_operations_are_faults() {
        let document = document();
        let err = document.parameters(HttpMethod::POST, "/users/:id").unwrap_err();
        match err {
            SpecError::UnknownOperation { method, path } => {
                assert_eq!(method, "POST");
                assert_eq!(path, "/users/{id}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
