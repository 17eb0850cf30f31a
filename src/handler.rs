use crate::api_validator::{ApiValidator, HttpMethod};
use crate::error::SpecError;
use crate::spec::ParameterSpec;
use crate::validation_helpers::{parse_query_string, render_errors};
use crate::violation::ValidationError;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Caller-supplied rejection renderer, invoked once per rejected request
pub type ErrorHandler =
    Arc<dyn Fn(&[ValidationError], &RequestParts) -> HttpResponse + Send + Sync>;

/// Framework-neutral view of an incoming request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParts {
    pub method: HttpMethod,
    pub url: String,
    pub query: Map<String, Value>,
    /// Path variables already extracted by the surrounding router. When
    /// `None` they are extracted from `url`.
    pub path_params: Option<Map<String, Value>>,
    pub body: Value,
}

impl RequestParts {
    /// A bodyless request; the query map is parsed from `url`.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            method,
            query: parse_query_string(&url),
            url,
            path_params: None,
            body: Value::Object(Map::new()),
        }
    }

    pub fn with_query(mut self, query: Map<String, Value>) -> Self {
        self.query = query;
        self
    }

    pub fn with_path_params(mut self, params: Map<String, Value>) -> Self {
        self.path_params = Some(params);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Violations of a rejected request, not yet rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub errors: Vec<ValidationError>,
}

impl Rejection {
    pub const STATUS: u16 = 400;

    pub fn into_response(self) -> HttpResponse {
        HttpResponse {
            status: Self::STATUS,
            body: render_errors(&self.errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The request conforms or is not described by the document
    Continue,
    /// No error handler is registered; the caller renders the rejection
    Rejected(Rejection),
    /// The registered error handler produced the response
    Handled(HttpResponse),
}

impl Outcome {
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

fn conclude(
    validator: &ApiValidator,
    errors: Vec<ValidationError>,
    request: &RequestParts,
) -> Outcome {
    if errors.is_empty() {
        return Outcome::Continue;
    }

    log::debug!(
        "Rejecting {} {} with {} violation(s)",
        request.method.as_str(),
        request.url,
        errors.len()
    );

    match validator.error_handler() {
        Some(handler) => Outcome::Handled(handler(errors.as_slice(), request)),
        None => Outcome::Rejected(Rejection { errors }),
    }
}

/// Validates requests for one declared operation
pub struct OperationHandler<'a> {
    validator: &'a ApiValidator,
    method: HttpMethod,
    template: String,
    parameters: &'a [ParameterSpec],
}

impl<'a> OperationHandler<'a> {
    pub(crate) fn new(
        validator: &'a ApiValidator,
        method: HttpMethod,
        template: String,
        parameters: &'a [ParameterSpec],
    ) -> Self {
        Self {
            validator,
            method,
            template,
            parameters,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        self.parameters
    }

    pub fn handle(&self, request: &RequestParts) -> Result<Outcome, SpecError> {
        let errors = self
            .validator
            .validate_operation(self.parameters, &self.template, request)?;
        Ok(conclude(self.validator, errors, request))
    }
}

/// Validates any request whose URL matches a declared path template.
/// Other requests continue unvalidated.
pub struct RouteHandler<'a> {
    validator: &'a ApiValidator,
}

impl<'a> RouteHandler<'a> {
    pub(crate) fn new(validator: &'a ApiValidator) -> Self {
        Self { validator }
    }

    pub fn handle(&self, request: &RequestParts) -> Result<Outcome, SpecError> {
        let Some(template) = self.validator.registry().find_template(&request.url)? else {
            log::debug!("No path template matches {}, passing through", request.url);
            return Ok(Outcome::Continue);
        };

        let parameters = match self
            .validator
            .document()
            .parameters(request.method, template.raw())
        {
            Ok(parameters) => parameters,
            Err(SpecError::UnknownOperation { .. }) => {
                log::debug!(
                    "{} is not declared on {}, passing through",
                    request.method.as_str(),
                    template.raw()
                );
                return Ok(Outcome::Continue);
            }
            Err(e) => return Err(e),
        };

        let errors = self
            .validator
            .validate_operation(parameters, template.raw(), request)?;
        Ok(conclude(self.validator, errors, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn new_requests_parse_their_query_and_default_to_an_empty_body() {
        let request = RequestParts::new(HttpMethod::GET, "/products?longitude=50");
        assert_eq!(Value::Object(request.query.clone()), json!({ "longitude": "50" }));
        assert_eq!(request.body, json!({}));
        assert_eq!(request.path_params, None);
    }

    #[test]
    fn default_rejections_render_a_400() {
        let rejection = Rejection {
            errors: vec![ValidationError::not_specified("latitude")],
        };
        assert_eq!(
            rejection.into_response(),
            HttpResponse {
                status: 400,
                body: "Error: Parameter : latitude is not specified.\n".to_string(),
            }
        );
    }
}
