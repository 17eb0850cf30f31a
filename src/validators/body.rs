use crate::error::SpecError;
use crate::spec::{ParameterSpec, SchemaDocument};
use crate::validators::structural::{check_schema, has_extra_fields};
use crate::validators::ValidationPolicy;
use crate::violation::ValidationError;
use serde_json::Value;

/// The part of the body a body parameter describes: the named field, or
/// the whole payload for an unnamed parameter.
fn target<'a>(spec: &ParameterSpec, body: &'a Value) -> Option<&'a Value> {
    if spec.name.is_empty() {
        Some(body)
    } else {
        body.get(&spec.name)
    }
}

/// Required and structural checks for the body parameter
pub fn check_body(
    document: &SchemaDocument,
    policy: ValidationPolicy,
    spec: &ParameterSpec,
    body: &Value,
) -> Result<Option<ValidationError>, SpecError> {
    let Some(schema) = &spec.schema else {
        return Ok(None);
    };

    let Some(value) = target(spec, body) else {
        return Ok(spec
            .required
            .then(|| ValidationError::not_specified(spec.label())));
    };

    if check_schema(document, policy, Some(value), schema)? {
        Ok(None)
    } else {
        Ok(Some(ValidationError::type_mismatch(spec.label())))
    }
}

/// Strict-mode check: a single violation for the body parameter when its
/// value holds an undeclared key anywhere.
pub fn check_body_extra_fields(
    document: &SchemaDocument,
    spec: &ParameterSpec,
    body: &Value,
) -> Result<Option<ValidationError>, SpecError> {
    let (Some(schema), Some(value)) = (&spec.schema, target(spec, body)) else {
        return Ok(None);
    };

    if has_extra_fields(document, value, schema)? {
        Ok(Some(ValidationError::extra_values(spec.label())))
    } else {
        Ok(None)
    }
}

/// Strict-mode check for a named body parameter: every other top-level
/// body key is undeclared.
pub fn undeclared_body_keys(spec: &ParameterSpec, body: &Value) -> Vec<ValidationError> {
    if spec.name.is_empty() {
        return Vec::new();
    }

    body.as_object()
        .into_iter()
        .flat_map(|fields| fields.keys())
        .filter(|key| **key != spec.name)
        .map(|key| ValidationError::extra_values(key.as_str()))
        .collect()
}
