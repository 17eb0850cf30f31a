use crate::error::SpecError;
use crate::spec::{ParameterLocation, ParameterSpec, SchemaDocument};
use crate::validators::body::{check_body, check_body_extra_fields, undeclared_body_keys};
use crate::validators::parameter::{check_parameter, undeclared_keys};
use crate::validators::ValidationPolicy;
use crate::violation::ValidationError;
use serde_json::{Map, Value};

/// Request data by location. `body` is the parsed body, or an empty
/// object for bodyless requests; form fields are read from it.
#[derive(Debug, Clone, Copy)]
pub struct RequestData<'a> {
    pub query: &'a Map<String, Value>,
    pub path: &'a Map<String, Value>,
    pub body: &'a Value,
}

/// Checks one request against the parameters of its operation.
///
/// Violations come in declaration order; strict-mode violations follow
/// them. Only document faults (dangling or cyclic references) are
/// returned as `Err`.
pub fn validate_request(
    document: &SchemaDocument,
    policy: ValidationPolicy,
    parameters: &[ParameterSpec],
    data: RequestData<'_>,
) -> Result<Vec<ValidationError>, SpecError> {
    let form = data.body.as_object();
    let mut errors = Vec::new();

    for spec in parameters {
        let error = match spec.location {
            ParameterLocation::Query => check_parameter(spec, data.query.get(&spec.name)),
            ParameterLocation::Path => check_parameter(spec, data.path.get(&spec.name)),
            ParameterLocation::FormData => {
                check_parameter(spec, form.and_then(|fields| fields.get(&spec.name)))
            }
            ParameterLocation::Body => check_body(document, policy, spec, data.body)?,
        };
        errors.extend(error);
    }

    if policy.strict {
        errors.extend(strict_violations(document, parameters, data)?);
    }

    Ok(errors)
}

/// Form fields share the body with a body parameter. With a body parameter
/// declared, top-level keys beside a named one are undeclared and its value
/// is walked against the schema. Otherwise body keys are checked against
/// the formData parameters.
fn strict_violations(
    document: &SchemaDocument,
    parameters: &[ParameterSpec],
    data: RequestData<'_>,
) -> Result<Vec<ValidationError>, SpecError> {
    let mut errors = undeclared_keys(parameters, ParameterLocation::Query, data.query);
    errors.extend(undeclared_keys(parameters, ParameterLocation::Path, data.path));

    match parameters
        .iter()
        .find(|p| p.location == ParameterLocation::Body)
    {
        Some(spec) => {
            errors.extend(undeclared_body_keys(spec, data.body));
            errors.extend(check_body_extra_fields(document, spec, data.body)?);
        }
        None => {
            if let Some(form) = data.body.as_object() {
                errors.extend(undeclared_keys(parameters, ParameterLocation::FormData, form));
            }
        }
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_validator::HttpMethod;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document() -> SchemaDocument {
        SchemaDocument::from_value(&json!({
            "paths": {
                "/orders/{id}": {
                    "post": {
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "type": "integer" },
                            { "name": "verbose", "in": "query", "type": "boolean" },
                            { "name": "quantity", "in": "formData", "required": true, "type": "integer" },
                            { "name": "channel", "in": "formData", "type": "string", "enum": ["web", "store"] }
                        ]
                    },
                    "put": {
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "type": "integer" },
                            { "name": "", "in": "body", "required": true, "schema": { "$ref": "#/definitions/Order" } }
                        ]
                    },
                    "patch": {
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "type": "integer" },
                            { "name": "line", "in": "body", "schema": { "$ref": "#/definitions/Line" } }
                        ]
                    }
                }
            },
            "definitions": {
                "Order": {
                    "type": "object",
                    "required": ["items"],
                    "properties": {
                        "items": { "type": "array", "items": { "$ref": "#/definitions/Line" } }
                    }
                },
                "Line": {
                    "type": "object",
                    "required": ["sku"],
                    "properties": { "sku": { "type": "string" }, "count": { "type": "integer" } }
                }
            }
        }))
        .unwrap()
    }

    fn run(
        method: HttpMethod,
        strict: bool,
        query: Value,
        path: Value,
        body: Value,
    ) -> Vec<String> {
        let document = document();
        let parameters = document.parameters(method, "/orders/{id}").unwrap();
        let policy = ValidationPolicy {
            strict,
            allow_null: true,
        };
        let data = RequestData {
            query: query.as_object().unwrap(),
            path: path.as_object().unwrap(),
            body: &body,
        };

        validate_request(&document, policy, parameters, data)
            .unwrap()
            .iter()
            .map(ValidationError::message)
            .collect()
    }

    #[test]
    fn reports_violations_in_declaration_order() {
        let errors = run(
            HttpMethod::POST,
            false,
            json!({ "verbose": "yes" }),
            json!({ "id": "abc" }),
            json!({ "channel": "phone" }),
        );
        assert_eq!(
            errors,
            vec![
                "Parameter : id does not respect its type.",
                "Parameter : verbose does not respect its type.",
                "Parameter : quantity is not specified.",
                "Parameter : channel has an unauthorized value.",
            ]
        );
    }

    #[test]
    fn conforming_form_requests_pass() {
        let errors = run(
            HttpMethod::POST,
            true,
            json!({ "verbose": "false" }),
            json!({ "id": "7" }),
            json!({ "quantity": "3", "channel": "web" }),
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn strict_mode_appends_undeclared_keys() {
        let errors = run(
            HttpMethod::POST,
            true,
            json!({ "debug": "1" }),
            json!({ "id": "7" }),
            json!({ "quantity": "3", "coupon": "FREE" }),
        );
        assert_eq!(
            errors,
            vec![
                "Parameter : debug contains extra values.",
                "Parameter : coupon contains extra values.",
            ]
        );
    }

    #[test]
    fn unnamed_body_parameters_describe_the_whole_payload() {
        let mistyped = run(
            HttpMethod::PUT,
            false,
            json!({}),
            json!({ "id": "7" }),
            json!({ "items": [{ "sku": 12 }] }),
        );
        assert_eq!(
            mistyped,
            vec!["Parameter : the payload within the body does not respect its type."]
        );

        let extra = run(
            HttpMethod::PUT,
            true,
            json!({}),
            json!({ "id": "7" }),
            json!({ "items": [{ "sku": "a", "gift": true }, { "sku": "b", "wrap": true }] }),
        );
        assert_eq!(
            extra,
            vec!["Parameter : the payload within the body contains extra values."]
        );
    }

    #[test]
    fn strict_mode_flags_keys_beside_a_named_body_parameter() {
        let errors = run(
            HttpMethod::PATCH,
            true,
            json!({}),
            json!({ "id": "7" }),
            json!({ "line": { "sku": "a", "note": "x" }, "injected": "x" }),
        );
        assert_eq!(
            errors,
            vec![
                "Parameter : injected contains extra values.",
                "Parameter : line contains extra values.",
            ]
        );

        let lenient = run(
            HttpMethod::PATCH,
            false,
            json!({}),
            json!({ "id": "7" }),
            json!({ "line": { "sku": "a" }, "injected": "x" }),
        );
        assert!(lenient.is_empty(), "{lenient:?}");
    }

    #[test]
    fn absent_optional_named_body_parameter_is_not_checked() {
        let errors = run(
            HttpMethod::PATCH,
            false,
            json!({}),
            json!({ "id": "7" }),
            json!({}),
        );
        assert!(errors.is_empty(), "{errors:?}");
    }
}
