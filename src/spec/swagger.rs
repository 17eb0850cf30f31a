//! Serde view of the parts of a Swagger 2.0 document used for request
//! validation. Everything else in the document is ignored.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Either an inline item or a `$ref` pointing to a reusable one
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReferenceOr<T> {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Item(T),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    #[serde(default)]
    pub base_path: Option<String>,
    pub paths: IndexMap<String, RawPathItem>,
    #[serde(default)]
    pub definitions: IndexMap<String, RawSchema>,
    #[serde(default)]
    pub parameters: IndexMap<String, RawParameter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPathItem {
    #[serde(default)]
    pub parameters: Vec<ReferenceOr<RawParameter>>,
    pub get: Option<RawOperation>,
    pub put: Option<RawOperation>,
    pub post: Option<RawOperation>,
    pub delete: Option<RawOperation>,
    pub options: Option<RawOperation>,
    pub head: Option<RawOperation>,
    pub patch: Option<RawOperation>,
}

impl RawPathItem {
    /// Declared operations with their lowercase method name
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &RawOperation)> {
        [
            ("get", &self.get),
            ("put", &self.put),
            ("post", &self.post),
            ("delete", &self.delete),
            ("options", &self.options),
            ("head", &self.head),
            ("patch", &self.patch),
        ]
        .into_iter()
        .filter_map(|(method, operation)| operation.as_ref().map(|op| (method, op)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOperation {
    #[serde(default)]
    pub parameters: Vec<ReferenceOr<RawParameter>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawParameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type")]
    pub param_type: Option<String>,
    pub format: Option<String>,
    pub schema: Option<RawSchema>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSchema {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub properties: Option<IndexMap<String, RawSchema>>,
    #[serde(default)]
    pub required: Vec<String>,
    pub items: Option<Box<RawSchema>>,
}
