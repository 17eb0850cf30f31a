use crate::api_validator::HttpMethod;
use crate::error::SpecError;
use crate::spec::document::{
    OperationMap, ParameterLocation, ParameterSpec, PrimitiveKind, ScalarKind, SchemaDocument,
    SchemaNode,
};
use crate::spec::reference_resolver::ResolveReference;
use crate::spec::swagger::{RawDocument, RawParameter, RawSchema, ReferenceOr};
use indexmap::IndexMap;
use serde_json::Value;
use std::str::FromStr;

/// Converts a raw schema into a [`SchemaNode`]. `context` names the
/// schema's location in log messages. Shapes the checker does not model
/// (`allOf`, `{}`, `file`, arrays without `items`) compile to
/// [`SchemaNode::Unsupported`] instead of failing the load.
fn build_schema(raw: &RawSchema, context: &str) -> SchemaNode {
    if let Some(reference) = &raw.reference {
        return SchemaNode::Ref(reference.clone());
    }

    let unsupported = |shape: String| {
        log::debug!("{} has an unsupported schema ({})", context, shape);
        SchemaNode::Unsupported(shape)
    };

    match raw.schema_type.as_deref() {
        Some("object") => build_object(raw, context),
        None if raw.properties.is_some() => build_object(raw, context),
        Some("array") => match &raw.items {
            Some(items) => {
                SchemaNode::Array(Box::new(build_schema(items, &format!("{}[]", context))))
            }
            None => unsupported("array without items".to_string()),
        },
        Some(other) => ScalarKind::from_str(other)
            .map(SchemaNode::Scalar)
            .unwrap_or_else(|_| unsupported(format!("type '{}'", other))),
        None => unsupported("no $ref, type or properties".to_string()),
    }
}

fn build_object(raw: &RawSchema, context: &str) -> SchemaNode {
    let properties = raw
        .properties
        .iter()
        .flatten()
        .map(|(name, property)| {
            let node = build_schema(property, &format!("{}.{}", context, name));
            (name.clone(), node)
        })
        .collect();

    SchemaNode::Object {
        properties,
        required: raw.required.iter().cloned().collect(),
    }
}

/// Enum literals are compared against raw request strings, so every
/// declared value is kept in its string form.
fn enum_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds a [`ParameterSpec`]. Header parameters are not validated and
/// yield `None`.
fn build_parameter(raw: &RawParameter, context: &str) -> Result<Option<ParameterSpec>, SpecError> {
    if raw.location == "header" {
        log::warn!("Skipping header parameter '{}' of {}", raw.name, context);
        return Ok(None);
    }

    let location = ParameterLocation::from_str(&raw.location).map_err(|_| {
        SpecError::InvalidDocument(format!(
            "parameter '{}' of {} has unknown location '{}'",
            raw.name, context, raw.location
        ))
    })?;

    let schema = match (location, &raw.schema) {
        (ParameterLocation::Body, Some(schema)) => Some(build_schema(
            schema,
            &format!("body parameter '{}' of {}", raw.name, context),
        )),
        (ParameterLocation::Body, None) => {
            return Err(SpecError::InvalidDocument(format!(
                "body parameter '{}' of {} has no schema",
                raw.name, context
            )))
        }
        _ => None,
    };

    let kind = match raw.param_type.as_deref() {
        Some(declared) => {
            let kind = PrimitiveKind::from_str(declared).ok();
            if kind.is_none() {
                log::debug!(
                    "Parameter '{}' of {} has unsupported type '{}'",
                    raw.name,
                    context,
                    declared
                );
            }
            kind
        }
        None => None,
    };

    Ok(Some(ParameterSpec {
        name: raw.name.clone(),
        location,
        required: raw.required,
        kind,
        declared_type: raw.param_type.clone(),
        format: raw.format.clone(),
        schema,
        enum_values: raw
            .enum_values
            .as_ref()
            .map(|values| values.iter().map(enum_literal).collect()),
    }))
}

/// Merges path-level and operation-level parameters. An operation
/// parameter replaces an inherited one with the same name and location.
fn build_operation_parameters(
    raw: &RawDocument,
    inherited: &[ReferenceOr<RawParameter>],
    declared: &[ReferenceOr<RawParameter>],
    context: &str,
) -> Result<Vec<ParameterSpec>, SpecError> {
    let mut parameters: Vec<ParameterSpec> = Vec::new();

    for parameter_ref in inherited.iter().chain(declared) {
        let parameter = parameter_ref.resolve(raw)?;
        let Some(spec) = build_parameter(parameter, context)? else {
            continue;
        };

        match parameters
            .iter_mut()
            .find(|p| p.name == spec.name && p.location == spec.location)
        {
            Some(existing) => *existing = spec,
            None => parameters.push(spec),
        }
    }

    let body_count = parameters
        .iter()
        .filter(|p| p.location == ParameterLocation::Body)
        .count();
    if body_count > 1 {
        return Err(SpecError::InvalidDocument(format!(
            "{} declares {} body parameters, at most one is allowed",
            context, body_count
        )));
    }

    Ok(parameters)
}

/// Builds the immutable [`SchemaDocument`] from a parsed Swagger document
pub fn build_schema_document(raw: RawDocument) -> Result<SchemaDocument, SpecError> {
    let mut operations: IndexMap<String, OperationMap> = IndexMap::new();

    for (path, path_item) in &raw.paths {
        let mut operation_map = OperationMap::new();

        for (method_str, operation) in path_item.iter() {
            let method = HttpMethod::from_str(method_str).map_err(|_| {
                SpecError::InvalidDocument(format!("Unknown HTTP method: {}", method_str))
            })?;

            let context = format!("{} {}", method.as_str(), path);
            let parameters = build_operation_parameters(
                &raw,
                &path_item.parameters,
                &operation.parameters,
                &context,
            )?;
            operation_map.insert(method, parameters);
        }

        if operation_map.is_empty() {
            log::debug!("Path '{}' declares no operations", path);
            continue;
        }
        operations.insert(path.clone(), operation_map);
    }

    if operations.is_empty() {
        return Err(SpecError::InvalidDocument(
            "document declares no operations".to_string(),
        ));
    }

    let definitions: IndexMap<String, SchemaNode> = raw
        .definitions
        .iter()
        .map(|(name, schema)| {
            let node = build_schema(schema, &format!("definition '{}'", name));
            (name.clone(), node)
        })
        .collect();

    log::debug!(
        "Built Swagger document with {} path(s) and {} definition(s)",
        operations.len(),
        definitions.len()
    );

    Ok(SchemaDocument {
        base_path: raw.base_path.unwrap_or_default(),
        operations,
        definitions,
    })
}
