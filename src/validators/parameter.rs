use crate::spec::{ParameterLocation, ParameterSpec};
use crate::validators::primitive::check_primitive;
use crate::violation::ValidationError;
use serde_json::{Map, Value};

/// Absent, `null` and empty-string values all count as not provided
fn provided(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null() && v.as_str() != Some(""))
}

fn enum_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn allowed_by_enum(spec: &ParameterSpec, value: &Value) -> bool {
    let Some(allowed) = &spec.enum_values else {
        return true;
    };

    let is_allowed = |v: &Value| allowed.contains(&enum_text(v));
    match value {
        Value::Array(values) => values.iter().all(is_allowed),
        other => is_allowed(other),
    }
}

/// Required, type and enum checks for a query, path or formData parameter.
///
/// At most one violation is reported per parameter.
pub fn check_parameter(spec: &ParameterSpec, value: Option<&Value>) -> Option<ValidationError> {
    match provided(value) {
        None if spec.required => Some(ValidationError::not_specified(spec.label())),
        None => None,
        Some(value) if !check_primitive(spec.kind, spec.format.as_deref(), value) => {
            if spec.kind.is_none() {
                log::debug!(
                    "{} parameter '{}' has unsupported type {:?}, its values never conform",
                    spec.location.as_str(),
                    spec.name,
                    spec.declared_type.as_deref().unwrap_or("<none>")
                );
            }
            Some(ValidationError::type_mismatch(spec.label()))
        }
        Some(value) if !allowed_by_enum(spec, value) => {
            Some(ValidationError::unauthorized_value(spec.label()))
        }
        Some(_) => None,
    }
}

/// One extra-values violation per key of `data` that no parameter at
/// `location` declares, in the order the keys appear.
pub fn undeclared_keys(
    parameters: &[ParameterSpec],
    location: ParameterLocation,
    data: &Map<String, Value>,
) -> Vec<ValidationError> {
    data.keys()
        .filter(|key| {
            !parameters
                .iter()
                .any(|p| p.location == location && &p.name == *key)
        })
        .map(|key| ValidationError::extra_values(key.as_str()))
        .collect()
}
