use crate::error::SpecError;
use crate::spec::{ScalarKind, SchemaDocument, SchemaNode};
use crate::validators::ValidationPolicy;
use serde_json::Value;

/// Checks a body value against a schema node.
///
/// `value` is `None` when the field is absent from the payload. An
/// explicit `null` conforms exactly when the policy allows nulls, whatever
/// the node's type. References are resolved lazily through `document`.
pub fn check_schema(
    document: &SchemaDocument,
    policy: ValidationPolicy,
    value: Option<&Value>,
    node: &SchemaNode,
) -> Result<bool, SpecError> {
    if let Some(Value::Null) = value {
        return Ok(policy.allow_null);
    }

    match document.dereference(node)? {
        SchemaNode::Ref(target) => Err(SpecError::UnresolvedReference(target.clone())),
        SchemaNode::Object {
            properties,
            required,
        } => {
            let Some(object) = value.and_then(Value::as_object) else {
                return Ok(false);
            };

            for (name, property) in properties {
                let field = object.get(name);
                if (required.contains(name) || field.is_some())
                    && !check_schema(document, policy, field, property)?
                {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        SchemaNode::Array(items) => {
            let Some(elements) = value.and_then(Value::as_array) else {
                return Ok(false);
            };

            for element in elements {
                if !check_schema(document, policy, Some(element), items)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        SchemaNode::Scalar(kind) => Ok(value.is_some_and(|v| scalar_conforms(*kind, v))),
        SchemaNode::Unsupported(shape) => {
            log::debug!("Value checked against an unsupported schema ({})", shape);
            Ok(false)
        }
    }
}

fn scalar_conforms(kind: ScalarKind, value: &Value) -> bool {
    match kind {
        ScalarKind::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => true,
            Value::Number(n) => n.as_f64().is_some_and(|f| f.fract() == 0.0),
            _ => false,
        },
        ScalarKind::Number => value.is_number(),
        ScalarKind::String => value.is_string(),
        ScalarKind::Boolean => value.is_boolean(),
    }
}

/// Reports whether `value` carries an object key the schema does not
/// declare, at any depth.
pub fn has_extra_fields(
    document: &SchemaDocument,
    value: &Value,
    node: &SchemaNode,
) -> Result<bool, SpecError> {
    match (document.dereference(node)?, value) {
        (SchemaNode::Object { properties, .. }, Value::Object(object)) => {
            for (key, field) in object {
                match properties.get(key) {
                    None => return Ok(true),
                    Some(property) => {
                        if has_extra_fields(document, field, property)? {
                            return Ok(true);
                        }
                    }
                }
            }
            Ok(false)
        }
        (SchemaNode::Array(items), Value::Array(elements)) => {
            for element in elements {
                if has_extra_fields(document, element, items)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        _ => Ok(false),
    }
}
